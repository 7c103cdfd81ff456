//! IRIs of the vocabularies the streaming layer knows about.

pub mod rdf {
    //! [RDF](https://www.w3.org/TR/rdf11-concepts/) vocabulary.

    /// The first item in the subject RDF list.
    pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    /// The class of language-tagged string literal values.
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
    /// The empty list.
    pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
    /// The rest of the subject RDF list after the first item.
    pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    /// The subject is an instance of a class.
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

pub mod xsd {
    //! [XML Schema datatypes](https://www.w3.org/TR/xmlschema11-2/) used for
    //! Turtle's inline literal forms.

    /// Boolean true/false.
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    /// Arbitrary-precision decimal numbers.
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    /// 64-bit floating point numbers.
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    /// Arbitrary-size integer numbers.
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    /// Character strings.
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
}
