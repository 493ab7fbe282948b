//! RDF graph sources parsed with `oxigraph`.
//!
//! A [`GraphSource`] is a single RDF file or a directory of RDF files. The
//! serialization is picked from the file extension; a trailing `.gz` means
//! the file is gzip-compressed. Every parsed statement is turned into a
//! [`Statement`]: IRI and blank-node objects become edges, literal objects
//! become literal attachments.
//!
//! Malformed statements are logged and skipped. I/O failures abort the load.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use oxigraph::io::{RdfFormat, RdfParseError, RdfParser};
use oxigraph::model::Term;

use crate::error::SourceError;
use crate::shorten::UriShortener;

use super::{DuplicatePolicy, TripleIndex};

/// Options applied while turning parsed quads into index entries.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Duplicate policy of the index being built.
    pub duplicate_policy: DuplicatePolicy,
    /// Applied to every subject, predicate and IRI object.
    pub shortener: UriShortener,
}

/// One parsed statement, identifiers already shortened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// An object triple between two entities.
    Edge {
        subject: String,
        predicate: String,
        object: String,
    },
    /// A literal attached to an entity.
    Literal {
        subject: String,
        predicate: String,
        text: String,
    },
}

impl Statement {
    /// Subject identifier of the statement.
    pub fn subject(&self) -> &str {
        match self {
            Statement::Edge { subject, .. } | Statement::Literal { subject, .. } => subject,
        }
    }

    /// Insert the statement into `index`, unless the index is full.
    pub fn insert_into(&self, index: &mut TripleIndex) -> Result<(), SourceError> {
        if index.is_full() {
            return Err(SourceError::CapacityExceeded {
                capacity: TripleIndex::CAPACITY,
            });
        }
        match self {
            Statement::Edge {
                subject,
                predicate,
                object,
            } => {
                index.add_edge(subject, predicate, object);
            }
            Statement::Literal {
                subject,
                predicate,
                text,
            } => {
                index.add_literal(subject, predicate, text);
            }
        }
        Ok(())
    }
}

/// Counters reported after a pass over a source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Files parsed.
    pub files: usize,
    /// Statements delivered to the visitor.
    pub statements: usize,
    /// Statements skipped because they were malformed or unsupported.
    pub skipped: usize,
}

#[derive(Debug, Clone)]
struct SourceFile {
    path: PathBuf,
    format: RdfFormat,
    gzipped: bool,
}

/// A graph on disk: one RDF file or a directory of RDF files.
#[derive(Debug, Clone)]
pub struct GraphSource {
    root: PathBuf,
    files: Vec<SourceFile>,
}

impl GraphSource {
    /// Resolve `path` into the list of files to parse.
    ///
    /// Directory entries with an unknown extension are skipped with a
    /// warning; a single file with an unknown extension is an error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let root = path.as_ref().to_path_buf();
        if !root.exists() {
            return Err(SourceError::NotFound {
                path: root.display().to_string(),
            });
        }

        let files = if root.is_dir() {
            let entries = std::fs::read_dir(&root).map_err(|source| SourceError::Io {
                path: root.display().to_string(),
                source,
            })?;
            let mut paths: Vec<PathBuf> = entries
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file())
                .collect();
            paths.sort();

            let mut files = Vec::with_capacity(paths.len());
            for path in paths {
                match detect_format(&path) {
                    Some((format, gzipped)) => files.push(SourceFile {
                        path,
                        format,
                        gzipped,
                    }),
                    None => tracing::warn!(
                        path = %path.display(),
                        "skipping file with unknown RDF extension"
                    ),
                }
            }
            files
        } else {
            let (format, gzipped) =
                detect_format(&root).ok_or_else(|| SourceError::UnknownFormat {
                    path: root.display().to_string(),
                })?;
            vec![SourceFile {
                path: root.clone(),
                format,
                gzipped,
            }]
        };

        Ok(Self { root, files })
    }

    /// The path this source was opened from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of files that will be parsed.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Parse the whole source into a new index.
    pub fn load(&self, options: &LoadOptions) -> Result<TripleIndex, SourceError> {
        let mut index = TripleIndex::with_policy(options.duplicate_policy);
        let mut inserted = Ok(());
        let stats = self.for_each_statement(options, |statement| {
            if inserted.is_ok() {
                inserted = statement.insert_into(&mut index);
            }
        })?;
        inserted?;
        tracing::info!(
            source = %self.root.display(),
            files = stats.files,
            statements = stats.statements,
            skipped = stats.skipped,
            nodes = index.node_count(),
            edges = index.edge_count(),
            literals = index.literal_count(),
            "graph loaded"
        );
        Ok(index)
    }

    /// Stream every statement of the source through `visit`.
    ///
    /// Nothing is retained between statements, so this is how light mode
    /// reads a graph that does not fit in memory.
    pub fn for_each_statement(
        &self,
        options: &LoadOptions,
        mut visit: impl FnMut(Statement),
    ) -> Result<LoadStats, SourceError> {
        let mut stats = LoadStats::default();
        for file in &self.files {
            self.parse_file(file, options, &mut visit, &mut stats)?;
            stats.files += 1;
        }
        Ok(stats)
    }

    fn parse_file(
        &self,
        file: &SourceFile,
        options: &LoadOptions,
        visit: &mut impl FnMut(Statement),
        stats: &mut LoadStats,
    ) -> Result<(), SourceError> {
        let io_error = |source: std::io::Error| SourceError::Io {
            path: file.path.display().to_string(),
            source,
        };
        let handle = File::open(&file.path).map_err(io_error)?;
        let reader: Box<dyn Read> = if file.gzipped {
            Box::new(GzDecoder::new(BufReader::new(handle)))
        } else {
            Box::new(BufReader::new(handle))
        };

        tracing::debug!(path = %file.path.display(), format = ?file.format, "parsing graph file");
        for result in RdfParser::from_format(file.format).for_reader(reader) {
            match result {
                Ok(quad) => {
                    let subject = Term::from(quad.subject);
                    match to_statement(subject, quad.predicate.as_str(), quad.object, options) {
                        Some(statement) => {
                            stats.statements += 1;
                            visit(statement);
                        }
                        None => stats.skipped += 1,
                    }
                }
                Err(RdfParseError::Syntax(error)) => {
                    stats.skipped += 1;
                    tracing::warn!(
                        path = %file.path.display(),
                        %error,
                        "skipping malformed statement"
                    );
                }
                Err(RdfParseError::Io(source)) => return Err(io_error(source)),
            }
        }
        Ok(())
    }
}

/// Pick the RDF format from a file name, looking through a `.gz` suffix.
fn detect_format(path: &Path) -> Option<(RdfFormat, bool)> {
    let name = path.file_name()?.to_str()?.to_ascii_lowercase();
    let (stem, gzipped) = match name.strip_suffix(".gz") {
        Some(stem) => (stem.to_owned(), true),
        None => (name, false),
    };
    let extension = Path::new(&stem).extension()?.to_str()?.to_owned();
    let format = match extension.as_str() {
        "owl" | "xml" => RdfFormat::RdfXml,
        other => RdfFormat::from_extension(other)?,
    };
    Some((format, gzipped))
}

fn to_statement(
    subject: Term,
    predicate: &str,
    object: Term,
    options: &LoadOptions,
) -> Option<Statement> {
    let subject = node_label(subject, &options.shortener)?;
    let predicate = options.shortener.shorten(predicate).into_owned();
    match object {
        Term::Literal(literal) => Some(Statement::Literal {
            subject,
            predicate,
            text: literal.value().to_owned(),
        }),
        other => Some(Statement::Edge {
            subject,
            predicate,
            object: node_label(other, &options.shortener)?,
        }),
    }
}

/// Identifier of an IRI or blank node; `None` for anything else.
#[allow(unreachable_patterns)]
fn node_label(term: Term, shortener: &UriShortener) -> Option<String> {
    match term {
        Term::NamedNode(node) => Some(shortener.shorten(node.as_str()).into_owned()),
        Term::BlankNode(node) => Some(format!("_:{}", node.as_str())),
        Term::Literal(_) => None,
        // Quoted triples are not walkable entities.
        _ => None,
    }
}
