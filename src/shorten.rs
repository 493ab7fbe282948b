//! Namespace-prefix shortening of graph identifiers.
//!
//! Full IRIs such as `http://dbpedia.org/resource/Paris` are collapsed to
//! compact tokens (`dbr:Paris`) before they enter the index, so every walk
//! carries the same stable vocabulary. Unknown namespaces pass through
//! unchanged, and the longest matching namespace wins.

use std::collections::BTreeMap;

/// Namespaces every run knows about, as `(namespace, code)`.
const DEFAULT_PREFIXES: &[(&str, &str)] = &[
    ("http://www.w3.org/1999/02/22-rdf-syntax-ns#", "rdf"),
    ("http://www.w3.org/2000/01/rdf-schema#", "rdfs"),
    ("http://www.w3.org/2002/07/owl#", "owl"),
    ("http://www.w3.org/2001/XMLSchema#", "xsd"),
    ("http://xmlns.com/foaf/0.1/", "foaf"),
    ("http://www.w3.org/2004/02/skos/core#", "skos"),
    ("http://purl.org/dc/elements/1.1/", "dc"),
    ("http://purl.org/dc/terms/", "dcterms"),
    ("http://schema.org/", "schema"),
    ("https://schema.org/", "schema"),
    ("http://dbpedia.org/resource/", "dbr"),
    ("http://dbpedia.org/ontology/", "dbo"),
    ("http://dbpedia.org/property/", "dbp"),
    ("http://www.wikidata.org/entity/", "wd"),
    ("http://www.wikidata.org/prop/direct/", "wdt"),
];

/// Bidirectional namespace ↔ code table.
#[derive(Debug, Clone, Default)]
pub struct UriShortener {
    /// `(namespace, code)` sorted by descending namespace length.
    by_namespace: Vec<(String, String)>,
    /// code → namespace, for [`expand`](Self::expand).
    by_code: BTreeMap<String, String>,
}

impl UriShortener {
    /// A shortener that maps every identifier to itself.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// A shortener preloaded with the common RDF namespaces.
    pub fn with_defaults() -> Self {
        let mut shortener = Self::default();
        for (namespace, code) in DEFAULT_PREFIXES {
            shortener.insert(namespace, code);
        }
        shortener
    }

    /// Register `namespace` under `code`, replacing an earlier entry for the
    /// same namespace.
    pub fn insert(&mut self, namespace: &str, code: &str) {
        self.by_namespace.retain(|(ns, _)| ns != namespace);
        self.by_namespace
            .push((namespace.to_owned(), code.to_owned()));
        self.by_namespace
            .sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        // The first namespace registered for a code stays its expansion.
        self.by_code
            .entry(code.to_owned())
            .or_insert_with(|| namespace.to_owned());
    }

    /// Add several `namespace → code` pairs.
    pub fn extend<'a>(&mut self, prefixes: impl IntoIterator<Item = (&'a String, &'a String)>) {
        for (namespace, code) in prefixes {
            self.insert(namespace, code);
        }
    }

    /// Whether no namespace is registered.
    pub fn is_empty(&self) -> bool {
        self.by_namespace.is_empty()
    }

    /// Shorten `uri` to `code:local` if a registered namespace prefixes it.
    ///
    /// Already shortened tokens never match a namespace, so shortening is
    /// idempotent.
    pub fn shorten<'a>(&self, uri: &'a str) -> std::borrow::Cow<'a, str> {
        for (namespace, code) in &self.by_namespace {
            if let Some(local) = uri.strip_prefix(namespace.as_str()) {
                if !local.is_empty() {
                    return std::borrow::Cow::Owned(format!("{code}:{local}"));
                }
            }
        }
        std::borrow::Cow::Borrowed(uri)
    }

    /// Reverse [`shorten`](Self::shorten) for tokens with a known code.
    pub fn expand<'a>(&self, token: &'a str) -> std::borrow::Cow<'a, str> {
        if let Some((code, local)) = token.split_once(':') {
            if let Some(namespace) = self.by_code.get(code) {
                return std::borrow::Cow::Owned(format!("{namespace}{local}"));
            }
        }
        std::borrow::Cow::Borrowed(token)
    }
}
