//! N-Quads writer and round-trip reader (RDF-star)
//!
//! The writer emits one line per quad in dataset order. Quoted triples use
//! the RDF-star `<< s p o >>` form, or are rewritten to explicit
//! reification first when so configured.
//!
//! The reader exists for the round-trip property: output re-parses into an
//! equal quad set. It covers exactly the constructs the writers emit.

use starweave_graph::{Dataset, Quad, Term, Triple};
use starweave_vocab::{rdf, xsd};

use crate::error::{FormatError, FormatResult};
use crate::reify::expand_reification;
use crate::text::{escape_literal, unescape_literal};
use crate::ReificationStyle;

/// Serialize a dataset to N-Quads text
pub fn write_nquads(dataset: &Dataset, style: ReificationStyle) -> String {
    let expanded;
    let dataset = match style {
        ReificationStyle::QuotedTriple => dataset,
        ReificationStyle::Explicit => {
            expanded = expand_reification(dataset);
            &expanded
        }
    };

    let mut out = String::new();
    for quad in dataset.iter() {
        write_term(&mut out, &quad.s);
        out.push(' ');
        write_term(&mut out, &quad.p);
        out.push(' ');
        write_term(&mut out, &quad.o);
        if let Some(g) = quad.graph() {
            out.push_str(" <");
            out.push_str(g);
            out.push('>');
        }
        out.push_str(" .\n");
    }
    out
}

fn write_term(out: &mut String, term: &Term) {
    match term {
        Term::Iri(iri) => {
            out.push('<');
            out.push_str(iri);
            out.push('>');
        }
        Term::BlankNode(id) => {
            out.push_str("_:");
            out.push_str(id.as_str());
        }
        Term::Literal {
            value,
            datatype,
            language,
        } => {
            out.push('"');
            out.push_str(&escape_literal(value));
            out.push('"');
            if let Some(lang) = language {
                out.push('@');
                out.push_str(lang);
            } else if datatype.as_ref() != xsd::STRING {
                out.push_str("^^<");
                out.push_str(datatype);
                out.push('>');
            }
        }
        Term::Quoted(triple) => {
            out.push_str("<< ");
            write_term(out, &triple.s);
            out.push(' ');
            write_term(out, &triple.p);
            out.push(' ');
            write_term(out, &triple.o);
            out.push_str(" >>");
        }
    }
}

/// Parse N-Quads(-star) text into a dataset
///
/// Accepts the writer's output: IRIs, blank nodes, literals with datatype
/// or language tag, nested `<< >>` quoted terms, optional graph IRIs, and
/// `#` comment lines.
pub fn read_nquads(input: &str) -> FormatResult<Dataset> {
    let mut dataset = Dataset::new();

    for (idx, line) in input.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut scanner = Scanner::new(trimmed, idx + 1);
        let s = scanner.parse_term()?;
        let p = scanner.parse_term()?;
        let o = scanner.parse_term()?;

        scanner.skip_ws();
        let graph = if scanner.peek() == Some('.') {
            None
        } else {
            match scanner.parse_term()? {
                Term::Iri(iri) => Some(iri.to_string()),
                other => {
                    return Err(scanner.err(format!("graph must be an IRI, got {}", other)));
                }
            }
        };

        scanner.expect('.')?;
        dataset.add(Quad::with_graph(s, p, o, graph.as_deref()));
    }

    Ok(dataset)
}

struct Scanner<'a> {
    line: &'a str,
    pos: usize,
    lineno: usize,
}

impl<'a> Scanner<'a> {
    fn new(line: &'a str, lineno: usize) -> Self {
        Self { line, pos: 0, lineno }
    }

    fn err(&self, message: impl Into<String>) -> FormatError {
        FormatError::Parse {
            line: self.lineno,
            message: message.into(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> FormatResult<()> {
        self.skip_ws();
        if self.eat(&c.to_string()) {
            Ok(())
        } else {
            Err(self.err(format!("expected '{}'", c)))
        }
    }

    fn parse_term(&mut self) -> FormatResult<Term> {
        self.skip_ws();

        if self.eat("<<") {
            let s = self.parse_term()?;
            let p = self.parse_term()?;
            let o = self.parse_term()?;
            self.skip_ws();
            if !self.eat(">>") {
                return Err(self.err("unterminated quoted triple"));
            }
            return Ok(Term::quoted(Triple::new(s, p, o)));
        }

        if self.eat("<") {
            let rest = self.rest();
            let end = rest
                .find('>')
                .ok_or_else(|| self.err("unterminated IRI"))?;
            let iri = &rest[..end];
            self.pos += end + 1;
            return Ok(Term::iri(iri));
        }

        if self.eat("_:") {
            let rest = self.rest();
            let end = rest
                .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-'))
                .unwrap_or(rest.len());
            if end == 0 {
                return Err(self.err("empty blank node label"));
            }
            let label = &rest[..end];
            self.pos += end;
            return Ok(Term::blank(label));
        }

        if self.eat("\"") {
            return self.parse_literal();
        }

        Err(self.err("expected a term"))
    }

    fn parse_literal(&mut self) -> FormatResult<Term> {
        // Find the closing quote, honoring backslash escapes.
        let rest = self.rest();
        let mut end = None;
        let mut escaped = false;
        for (i, c) in rest.char_indices() {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                end = Some(i);
                break;
            }
        }
        let end = end.ok_or_else(|| self.err("unterminated literal"))?;
        let value = unescape_literal(&rest[..end]);
        self.pos += end + 1;

        if self.eat("@") {
            let rest = self.rest();
            let end = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
                .unwrap_or(rest.len());
            if end == 0 {
                return Err(self.err("empty language tag"));
            }
            let lang = &rest[..end];
            self.pos += end;
            return Ok(Term::lang_string(value, lang));
        }

        if self.eat("^^") {
            if !self.eat("<") {
                return Err(self.err("expected datatype IRI"));
            }
            let rest = self.rest();
            let end = rest
                .find('>')
                .ok_or_else(|| self.err("unterminated datatype IRI"))?;
            let datatype = &rest[..end];
            self.pos += end + 1;
            if datatype == rdf::LANG_STRING {
                return Err(self.err("rdf:langString literal without language tag"));
            }
            return Ok(Term::typed(value, datatype));
        }

        Ok(Term::string(value))
    }
}
