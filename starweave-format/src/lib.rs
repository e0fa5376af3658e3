//! RDF-star serialization boundary for starweave
//!
//! This crate turns the engine's finished quad stream into text in one of
//! three formats (Turtle, TriG, N-Quads), with quoted triples rendered
//! either in RDF-star `<< >>` syntax or rewritten to explicit
//! `rdf:Statement` reification. It also provides the [`QuadSink`] trait the
//! engine publishes through, an atomic [`FileSink`], and an N-Quads-star
//! reader used to verify that output re-parses into an equal quad set.

mod error;
mod nquads;
mod reify;
mod sink;
mod text;
mod turtle;

pub use error::{FormatError, FormatResult};
pub use nquads::{read_nquads, write_nquads};
pub use reify::expand_reification;
pub use sink::{FileSink, QuadSink, StringSink};
pub use turtle::{write_trig, write_turtle};

use starweave_graph::Dataset;

/// Output serialization format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Turtle (default graph only)
    Turtle,
    /// TriG (named graphs)
    #[default]
    TriG,
    /// N-Quads (line-based)
    NQuads,
}

impl OutputFormat {
    /// Guess the format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "ttl" | "turtle" => Some(OutputFormat::Turtle),
            "trig" => Some(OutputFormat::TriG),
            "nq" | "nquads" => Some(OutputFormat::NQuads),
            _ => None,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputFormat::Turtle => "turtle",
            OutputFormat::TriG => "trig",
            OutputFormat::NQuads => "nquads",
        };
        f.write_str(name)
    }
}

/// How quoted triples are encoded in the output
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReificationStyle {
    /// RDF-star quoted-triple syntax (`<< s p o >>`)
    #[default]
    QuotedTriple,
    /// Classic `rdf:Statement` descriptions, no RDF-star syntax
    Explicit,
}

/// Serialize a dataset in the chosen format and reification style
pub fn write_dataset(
    dataset: &Dataset,
    format: OutputFormat,
    reification: ReificationStyle,
) -> FormatResult<String> {
    match format {
        OutputFormat::Turtle => write_turtle(dataset, reification),
        OutputFormat::TriG => write_trig(dataset, reification),
        OutputFormat::NQuads => Ok(write_nquads(dataset, reification)),
    }
}
