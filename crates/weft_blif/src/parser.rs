//! Recursive-descent parser producing a [`BlifModel`].
//!
//! The grammar accepted is
//!
//! ```text
//! model   := ".model" NAME ".inputs" NAME+ ".outputs" NAME+ command* ".end"
//! command := ".names" NAME+ row*
//!          | ".subckt" DFF_CELL FORMAL+
//!          | ".latch" NAME NAME "re" NAME [INIT]
//! ```
//!
//! Signal names and cover rows are told apart by their first character: a
//! name never starts with a digit or `-`.

use crate::ast::{BlifModel, Command, CoverRow, DffCell, LatchDef, NamesDef, Net, SubcktDef};
use crate::error::{NetlistError, LATCH_INIT_IGNORED};
use crate::token::{Token, TokenKind};
use weft_diagnostics::{Diagnostic, DiagnosticSink};
use weft_source::Span;

/// Parser state over a token vector.
pub struct Parser<'src> {
    tokens: Vec<Token>,
    pos: usize,
    source: &'src str,
    sink: &'src DiagnosticSink,
}

type ParseResult<T> = Result<T, NetlistError>;

impl<'src> Parser<'src> {
    /// Creates a parser. `tokens` must end with [`TokenKind::Eof`].
    pub fn new(tokens: Vec<Token>, source: &'src str, sink: &'src DiagnosticSink) -> Self {
        Self {
            tokens,
            pos: 0,
            source,
            sink,
        }
    }

    fn current(&self) -> Token {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    fn current_text(&self) -> &'src str {
        let span = self.current().span;
        &self.source[span.start as usize..span.end as usize]
    }

    fn prev_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span
    }

    fn advance(&mut self) {
        if self.current_kind() != TokenKind::Eof {
            self.pos += 1;
        }
    }

    fn at_directive(&self, name: &str) -> bool {
        self.current_kind() == TokenKind::Directive && self.current_text() == name
    }

    fn syntax<T>(&self, message: impl Into<String>) -> ParseResult<T> {
        Err(NetlistError::Syntax {
            message: message.into(),
            span: self.current().span,
        })
    }

    fn describe_current(&self) -> String {
        match self.current_kind() {
            TokenKind::Eof => "end of file".to_string(),
            _ => format!("`{}`", self.current_text()),
        }
    }

    fn expect_directive(&mut self, name: &str) -> ParseResult<Span> {
        if self.at_directive(name) {
            let span = self.current().span;
            self.advance();
            return Ok(span);
        }
        self.syntax(format!("expected `{name}`, found {}", self.describe_current()))
    }

    fn expect_name(&mut self, what: &str) -> ParseResult<Net> {
        if self.current_kind() == TokenKind::Word && is_valid_name(self.current_text()) {
            let net = Net {
                name: self.current_text().to_string(),
                span: self.current().span,
            };
            self.advance();
            return Ok(net);
        }
        self.syntax(format!("expected {what}, found {}", self.describe_current()))
    }

    /// Parses the single model making up the file.
    pub fn parse_model(&mut self) -> ParseResult<BlifModel> {
        let start = self.expect_directive(".model")?;
        let name = self.expect_name("a model name")?;

        self.expect_directive(".inputs")?;
        let inputs = self.parse_port_list(".inputs")?;
        self.expect_directive(".outputs")?;
        let outputs = self.parse_port_list(".outputs")?;

        let mut commands = Vec::new();
        loop {
            match self.current_kind() {
                TokenKind::Eof => return self.syntax("missing `.end` at end of file"),
                TokenKind::Word => {
                    return self.syntax(format!(
                        "unexpected {}, expected a command",
                        self.describe_current()
                    ))
                }
                TokenKind::Directive => {}
            }
            match self.current_text() {
                ".end" => {
                    self.advance();
                    break;
                }
                ".names" => commands.push(Command::Names(self.parse_names()?)),
                ".subckt" => commands.push(Command::Subckt(self.parse_subckt()?)),
                ".latch" => commands.push(Command::Latch(self.parse_latch()?)),
                ".model" => {
                    return Err(NetlistError::MultipleModelsUnsupported {
                        span: self.current().span,
                    })
                }
                other => {
                    return Err(NetlistError::UnknownCommand {
                        command: other.to_string(),
                        span: self.current().span,
                    })
                }
            }
        }
        let span = start.to(self.prev_span());

        if self.at_directive(".model") {
            return Err(NetlistError::MultipleModelsUnsupported {
                span: self.current().span,
            });
        }
        if self.current_kind() != TokenKind::Eof {
            return self.syntax(format!(
                "unexpected {} after `.end`",
                self.describe_current()
            ));
        }

        Ok(BlifModel {
            name,
            inputs,
            outputs,
            commands,
            span,
        })
    }

    fn parse_port_list(&mut self, directive: &str) -> ParseResult<Vec<Net>> {
        let mut nets = Vec::new();
        while self.current_kind() == TokenKind::Word {
            nets.push(self.expect_name("a signal name")?);
        }
        if nets.is_empty() {
            return self.syntax(format!("`{directive}` needs at least one signal name"));
        }
        Ok(nets)
    }

    fn parse_names(&mut self) -> ParseResult<NamesDef> {
        let start = self.expect_directive(".names")?;
        let mut signals = Vec::new();
        while self.current_kind() == TokenKind::Word && is_valid_name(self.current_text()) {
            signals.push(self.expect_name("a signal name")?);
        }
        if signals.is_empty() {
            return self.syntax("`.names` needs at least one signal name");
        }

        let width = signals.len() - 1;
        let mut rows = Vec::new();
        while self.current_kind() == TokenKind::Word {
            rows.push(self.parse_cover_row(width)?);
        }

        Ok(NamesDef {
            signals,
            rows,
            span: start.to(self.prev_span()),
        })
    }

    fn parse_cover_row(&mut self, width: usize) -> ParseResult<CoverRow> {
        let start = self.current().span;
        let pattern = if width == 0 {
            String::new()
        } else {
            let text = self.current_text();
            if text.len() != width || !text.bytes().all(|b| matches!(b, b'0' | b'1' | b'-')) {
                return self.syntax(format!(
                    "invalid cover pattern `{text}`: expected {width} of `0`, `1`, `-`"
                ));
            }
            self.advance();
            text.to_string()
        };

        let value = match (self.current_kind(), self.current_text()) {
            (TokenKind::Word, "1") => true,
            (TokenKind::Word, "0") => false,
            _ if width > 0 => {
                return self.syntax(format!(
                    "cover row `{pattern}` needs an output value `0` or `1`, found {}",
                    self.describe_current()
                ))
            }
            _ => {
                return self.syntax(format!(
                    "invalid constant cover `{}`: expected `0` or `1`",
                    self.current_text()
                ))
            }
        };
        self.advance();

        Ok(CoverRow {
            pattern,
            value,
            span: start.to(self.prev_span()),
        })
    }

    fn parse_subckt(&mut self) -> ParseResult<SubcktDef> {
        let start = self.expect_directive(".subckt")?;
        if self.current_kind() != TokenKind::Word {
            return self.syntax(format!(
                "expected a cell name after `.subckt`, found {}",
                self.describe_current()
            ));
        }
        let cell_span = self.current().span;
        let cell_name = self.current_text();
        let Some(cell) = DffCell::from_name(cell_name) else {
            return Err(NetlistError::UnknownCommand {
                command: format!(".subckt {cell_name}"),
                span: start.to(cell_span),
            });
        };
        self.advance();

        let formals = cell.formals();
        let mut actuals: Vec<Option<Net>> = vec![None; formals.len()];
        while self.current_kind() == TokenKind::Word {
            let text = self.current_text();
            let span = self.current().span;
            let Some((formal, actual)) = text.split_once('=') else {
                return self.syntax(format!("expected a `PIN=net` connection, found `{text}`"));
            };
            let Some(slot) = formals.iter().position(|f| *f == formal) else {
                return self.syntax(format!("`{}` has no pin `{formal}`", cell.name()));
            };
            if actuals[slot].is_some() {
                return self.syntax(format!("pin `{formal}` connected twice"));
            }
            if !is_valid_name(actual) {
                return self.syntax(format!("`{actual}` is not a valid net name"));
            }
            let offset = (formal.len() + 1) as u32;
            actuals[slot] = Some(Net {
                name: actual.to_string(),
                span: Span::new(span.file, span.start + offset, span.end),
            });
            self.advance();
        }

        let span = start.to(self.prev_span());
        let mut take = |pin: &str| -> ParseResult<Net> {
            formals
                .iter()
                .position(|f| *f == pin)
                .and_then(|slot| actuals[slot].take())
                .ok_or_else(|| NetlistError::Syntax {
                    message: format!("`{}` is missing pin `{pin}`", cell.name()),
                    span,
                })
        };
        let clock = take("C")?;
        let reset = match cell {
            DffCell::P => None,
            _ => Some(take("R")?),
        };
        let d = take("D")?;
        let q = take("Q")?;

        Ok(SubcktDef {
            cell,
            clock,
            reset,
            d,
            q,
            span,
        })
    }

    fn parse_latch(&mut self) -> ParseResult<LatchDef> {
        let start = self.expect_directive(".latch")?;
        let d = self.expect_name("the latch input")?;
        let q = self.expect_name("the latch output")?;

        if self.current_kind() != TokenKind::Word || self.current_text() != "re" {
            return self.syntax(format!(
                "unsupported latch type {}: only rising-edge `re` latches are supported",
                self.describe_current()
            ));
        }
        self.advance();
        let clock = self.expect_name("the latch clock")?;

        let init = match (self.current_kind(), self.current_text()) {
            (TokenKind::Word, text @ ("0" | "1" | "2" | "3")) => {
                let span = self.current().span;
                self.advance();
                let value = text.as_bytes()[0] - b'0';
                if value < 2 {
                    self.sink.emit(
                        Diagnostic::note(
                            LATCH_INIT_IGNORED,
                            format!("initial value {value} of `{}` is ignored", q.name),
                            span,
                        )
                        .with_note("registers start undefined in the generated design"),
                    );
                }
                Some(value)
            }
            _ => None,
        };

        Ok(LatchDef {
            d,
            q,
            clock,
            init,
            span: start.to(self.prev_span()),
        })
    }
}

/// Whether `text` is a legal BLIF signal name.
pub fn is_valid_name(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if is_name_start(c) => chars.all(is_name_char),
        _ => false,
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || "$:[]_<>\\/".contains(c)
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '.'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use weft_diagnostics::Severity;
    use weft_source::FileId;

    fn parse_with(source: &str, sink: &DiagnosticSink) -> ParseResult<BlifModel> {
        let tokens = lex(source, FileId::from_raw(0));
        Parser::new(tokens, source, sink).parse_model()
    }

    fn parse(source: &str) -> ParseResult<BlifModel> {
        parse_with(source, &DiagnosticSink::new())
    }

    fn syntax_message(source: &str) -> String {
        match parse(source) {
            Err(NetlistError::Syntax { message, .. }) => message,
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    const HEADER: &str = ".model top\n.inputs a b clk\n.outputs y\n";

    #[test]
    fn minimal_model() {
        let model = parse(".model top\n.inputs a\n.outputs y\n.names a y\n1 1\n.end\n").unwrap();
        assert_eq!(model.name.name, "top");
        assert_eq!(model.inputs.len(), 1);
        assert_eq!(model.outputs[0].name, "y");
        assert_eq!(model.commands.len(), 1);
        let Command::Names(def) = &model.commands[0] else {
            panic!("expected .names");
        };
        assert_eq!(def.signals.len(), 2);
        assert_eq!(def.rows.len(), 1);
        assert_eq!(def.rows[0].pattern, "1");
        assert!(def.rows[0].value);
    }

    #[test]
    fn model_span_covers_end() {
        let src = ".model top\n.inputs a\n.outputs y\n.end\n";
        let model = parse(src).unwrap();
        assert_eq!(model.span.start, 0);
        assert_eq!(model.span.end as usize, src.len() - 1);
        assert!(model.commands.is_empty());
    }

    #[test]
    fn constant_covers() {
        let model = parse(&format!("{HEADER}.names y\n1\n.names z\n.end\n")).unwrap();
        let Command::Names(one) = &model.commands[0] else {
            panic!()
        };
        assert_eq!(one.rows.len(), 1);
        assert_eq!(one.rows[0].pattern, "");
        let Command::Names(zero) = &model.commands[1] else {
            panic!()
        };
        assert!(zero.rows.is_empty());
    }

    #[test]
    fn multi_row_cover_on_one_line() {
        let model = parse(&format!("{HEADER}.names a b y 1- 1 -1 1\n.end")).unwrap();
        let Command::Names(def) = &model.commands[0] else {
            panic!()
        };
        assert_eq!(def.signals.len(), 3);
        let rows: Vec<String> = def.rows.iter().map(|r| r.to_string()).collect();
        assert_eq!(rows, vec!["1- 1", "-1 1"]);
    }

    #[test]
    fn wrong_pattern_length() {
        let msg = syntax_message(&format!("{HEADER}.names a b y\n111 1\n.end\n"));
        assert!(msg.contains("invalid cover pattern `111`"), "{msg}");
    }

    #[test]
    fn missing_output_value() {
        let msg = syntax_message(&format!("{HEADER}.names a b y\n11\n.end\n"));
        assert!(msg.contains("needs an output value"), "{msg}");
    }

    #[test]
    fn bad_constant_row() {
        let msg = syntax_message(&format!("{HEADER}.names y\n11\n.end\n"));
        assert!(msg.contains("invalid constant cover `11`"), "{msg}");
    }

    #[test]
    fn subckt_formals_in_any_order() {
        let model = parse(&format!(
            "{HEADER}.subckt $_DFF_PN0_ Q=q D=a R=b C=clk\n.end\n"
        ))
        .unwrap();
        let Command::Subckt(ff) = &model.commands[0] else {
            panic!()
        };
        assert_eq!(ff.cell, DffCell::Pn0);
        assert_eq!(ff.clock.name, "clk");
        assert_eq!(ff.reset.as_ref().map(|n| n.name.as_str()), Some("b"));
        assert_eq!(ff.d.name, "a");
        assert_eq!(ff.q.name, "q");
    }

    #[test]
    fn subckt_net_span_skips_pin_name() {
        let src = format!("{HEADER}.subckt $_DFF_P_ C=clk D=a Q=q\n.end\n");
        let model = parse(&src).unwrap();
        let Command::Subckt(ff) = &model.commands[0] else {
            panic!()
        };
        assert_eq!(&src[ff.q.span.start as usize..ff.q.span.end as usize], "q");
        assert!(ff.reset.is_none());
    }

    #[test]
    fn subckt_missing_pin() {
        let msg = syntax_message(&format!("{HEADER}.subckt $_DFF_PP0_ C=clk D=a Q=q\n.end\n"));
        assert!(msg.contains("missing pin `R`"), "{msg}");
    }

    #[test]
    fn subckt_repeated_pin() {
        let msg = syntax_message(&format!("{HEADER}.subckt $_DFF_P_ C=clk C=a D=a Q=q\n.end\n"));
        assert!(msg.contains("connected twice"), "{msg}");
    }

    #[test]
    fn subckt_unexpected_pin() {
        let msg = syntax_message(&format!("{HEADER}.subckt $_DFF_P_ C=clk R=b D=a Q=q\n.end\n"));
        assert!(msg.contains("no pin `R`"), "{msg}");
    }

    #[test]
    fn subckt_unknown_cell() {
        let err = parse(&format!("{HEADER}.subckt $_AND_ A=a B=b Y=y\n.end\n")).unwrap_err();
        assert_eq!(
            err,
            NetlistError::UnknownCommand {
                command: ".subckt $_AND_".to_string(),
                span: err.span(),
            }
        );
    }

    #[test]
    fn latch_with_init_emits_note() {
        let sink = DiagnosticSink::new();
        let model = parse_with(&format!("{HEADER}.latch a q re clk 0\n.end\n"), &sink).unwrap();
        let Command::Latch(latch) = &model.commands[0] else {
            panic!()
        };
        assert_eq!(latch.init, Some(0));
        assert_eq!(latch.clock.name, "clk");
        let diags = sink.take_all();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Note);
    }

    #[test]
    fn latch_dont_care_init_is_silent() {
        let sink = DiagnosticSink::new();
        let model = parse_with(&format!("{HEADER}.latch a q re clk 2\n.end\n"), &sink).unwrap();
        let Command::Latch(latch) = &model.commands[0] else {
            panic!()
        };
        assert_eq!(latch.init, Some(2));
        assert!(sink.take_all().is_empty());
    }

    #[test]
    fn latch_other_type_rejected() {
        let msg = syntax_message(&format!("{HEADER}.latch a q fe clk\n.end\n"));
        assert!(msg.contains("unsupported latch type `fe`"), "{msg}");
    }

    #[test]
    fn unknown_directive() {
        let err = parse(&format!("{HEADER}.gate and2 A=a\n.end\n")).unwrap_err();
        assert!(matches!(err, NetlistError::UnknownCommand { ref command, .. } if command == ".gate"));
    }

    #[test]
    fn second_model_rejected() {
        let src = format!("{HEADER}.end\n.model other\n.inputs x\n.outputs z\n.end\n");
        assert!(matches!(
            parse(&src),
            Err(NetlistError::MultipleModelsUnsupported { .. })
        ));
        let nested = format!("{HEADER}.model other\n.end\n");
        assert!(matches!(
            parse(&nested),
            Err(NetlistError::MultipleModelsUnsupported { .. })
        ));
    }

    #[test]
    fn missing_end() {
        let msg = syntax_message(&format!("{HEADER}.names a y\n1 1\n"));
        assert!(msg.contains("missing `.end`"), "{msg}");
    }

    #[test]
    fn trailing_text_after_end() {
        let msg = syntax_message(&format!("{HEADER}.end\nstray\n"));
        assert!(msg.contains("after `.end`"), "{msg}");
    }

    #[test]
    fn missing_inputs() {
        let msg = syntax_message(".model top\n.outputs y\n.end\n");
        assert_eq!(msg, "expected `.inputs`, found `.outputs`");
    }

    #[test]
    fn invalid_port_name() {
        let msg = syntax_message(".model top\n.inputs 9a\n.outputs y\n.end\n");
        assert_eq!(msg, "expected a signal name, found `9a`");
    }

    #[test]
    fn empty_port_list() {
        let msg = syntax_message(".model top\n.inputs\n.outputs y\n.end\n");
        assert!(msg.contains("`.inputs` needs at least one"), "{msg}");
    }

    #[test]
    fn name_character_classes() {
        assert!(is_valid_name("a"));
        assert!(is_valid_name("$abc$12.x"));
        assert!(is_valid_name("\\data[3]"));
        assert!(is_valid_name("<tmp>/n:1"));
        assert!(!is_valid_name("1a"));
        assert!(!is_valid_name("-"));
        assert!(!is_valid_name(".x"));
        assert!(!is_valid_name("a=b"));
        assert!(!is_valid_name(""));
    }
}
