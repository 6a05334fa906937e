//! Well-known IRIs referenced by extension descriptions.

/// `rdf:type`, written `a` in documents.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// Datatype IRI for boolean literals.
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

/// Relation from a document base to the extension it describes.
pub const FOAF_PRIMARY_TOPIC: &str = "http://xmlns.com/foaf/0.1/primaryTopic";

/// Namespace of the extension configuration vocabulary.
pub const EXTENSION_CONFIG_NS: &str = "http://ns.ontowiki.net/SysOnt/ExtensionConfig/";

/// Project description (DOAP) namespace.
pub const DOAP_NS: &str = "http://usefulinc.com/ns/doap#";
