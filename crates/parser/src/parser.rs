//! Winnow-based parser for the comma-separated scenario text format.
//!
//! Grammar:
//! ```text
//! scenario = trivia header table(n) table(n) trivia EOF
//! header   = COUNT "," COUNT ("," UNITS){m} ","? EOL     -- n, m, total units
//! table(n) = (trivia row){n}                             -- omitted when m = 0
//! row      = UNITS ("," UNITS){m-1} ","? EOL
//! trivia   = (comment | blank)*
//! comment  = "//" REST_OF_LINE EOL
//! EOL      = NEWLINE | EOF
//! ```
//!
//! The first table is the allocation, the second the request. Inline
//! whitespace is allowed around every value and separator.

use rag_core::Scenario;
use winnow::ascii::{dec_uint, line_ending, till_line_ending};
use winnow::combinator::{alt, eof, fail, opt, repeat};
use winnow::error::{ContextError, ErrMode, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{literal, take_while};
use winnow::ModalResult;

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// A parse error with human-readable location information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "parse error at line {}, column {}: {}",
            self.line, self.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Parse a scenario in the text format.
///
/// Only the shape is checked here. Whether the allocation fits in the total
/// units is decided by [`rag_core::Snapshot::new`].
///
/// # Errors
///
/// Returns a [`ParseError`] with line/column information when the input does
/// not conform to the grammar, including rows with too few or too many
/// values and files with fewer rows than the header announces.
pub fn parse_scenario(input: &str) -> Result<Scenario, ParseError> {
    let original = input;
    let mut stream: &str = input;
    match scenario_parser.parse_next(&mut stream) {
        Ok(scenario) => Ok(scenario),
        Err(e) => {
            let remaining_len = stream.len();
            let consumed = original.len().saturating_sub(remaining_len);
            let (line, column) = offset_to_line_col(original, consumed);
            Err(ParseError {
                message: error_message(&e),
                line,
                column,
            })
        }
    }
}

fn error_message(error: &ErrMode<ContextError>) -> String {
    let message = match error {
        ErrMode::Backtrack(context) | ErrMode::Cut(context) => context.to_string(),
        ErrMode::Incomplete(_) => String::new(),
    };
    if message.is_empty() {
        "unexpected input".to_string()
    } else {
        message.replace('\n', ", ")
    }
}

// ---------------------------------------------------------------------------
// Line/column helper
// ---------------------------------------------------------------------------

/// Convert a byte offset into the original input to 1-based (line, column).
fn offset_to_line_col(input: &str, offset: usize) -> (usize, usize) {
    let safe_offset = offset.min(input.len());
    let prefix = &input[..safe_offset];
    let line = prefix.bytes().filter(|&b| b == b'\n').count() + 1;
    let column = prefix
        .rfind('\n')
        .map_or_else(|| prefix.len() + 1, |pos| prefix.len() - pos);
    (line, column)
}

// ---------------------------------------------------------------------------
// Whitespace and trivia
// ---------------------------------------------------------------------------

/// Optional inline whitespace: spaces and tabs only (no newlines).
fn opt_inline_ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c == ' ' || c == '\t')
        .void()
        .parse_next(input)
}

/// A line terminator, or the end of input for an unterminated last line.
fn eol(input: &mut &str) -> ModalResult<()> {
    alt((line_ending.void(), eof.void())).parse_next(input)
}

/// `"//" <rest-of-line> EOL`
fn comment_line(input: &mut &str) -> ModalResult<()> {
    opt_inline_ws.parse_next(input)?;
    literal("//").parse_next(input)?;
    till_line_ending.parse_next(input)?;
    eol.parse_next(input)
}

/// A line holding nothing but whitespace.
fn blank_line(input: &mut &str) -> ModalResult<()> {
    opt_inline_ws.parse_next(input)?;
    line_ending.void().parse_next(input)
}

/// Any run of comment and blank lines.
fn trivia(input: &mut &str) -> ModalResult<()> {
    repeat::<_, _, (), _, _>(0.., alt((comment_line, blank_line))).parse_next(input)
}

// ---------------------------------------------------------------------------
// Leaf parsers
// ---------------------------------------------------------------------------

/// A unit count.
fn units(input: &mut &str) -> ModalResult<u64> {
    dec_uint
        .context(StrContext::Expected(StrContextValue::Description(
            "unsigned integer",
        )))
        .parse_next(input)
}

/// A process or resource-class count.
fn count(input: &mut &str) -> ModalResult<usize> {
    dec_uint
        .context(StrContext::Expected(StrContextValue::Description(
            "unsigned integer",
        )))
        .parse_next(input)
}

/// `","` with inline whitespace on either side.
fn comma(input: &mut &str) -> ModalResult<()> {
    (opt_inline_ws, literal(","), opt_inline_ws)
        .void()
        .context(StrContext::Expected(StrContextValue::CharLiteral(',')))
        .parse_next(input)
}

/// End of a record: an optional trailing `,` then EOL.
fn end_of_record(input: &mut &str) -> ModalResult<()> {
    (opt_inline_ws, opt(literal(",")), opt_inline_ws, eol)
        .void()
        .context(StrContext::Expected(StrContextValue::Description(
            "end of line",
        )))
        .parse_next(input)
}

// ---------------------------------------------------------------------------
// Record parsers
// ---------------------------------------------------------------------------

/// `n, m, U0, ..., U(m-1)`
fn header(input: &mut &str) -> ModalResult<(usize, Vec<u64>)> {
    opt_inline_ws.parse_next(input)?;
    let processes = count.parse_next(input)?;
    comma.parse_next(input)?;
    let resources = count.parse_next(input)?;
    let mut total_units = Vec::new();
    for _ in 0..resources {
        comma.parse_next(input)?;
        total_units.push(units.parse_next(input)?);
    }
    end_of_record.parse_next(input)?;
    Ok((processes, total_units))
}

/// One row of exactly `resources` values. Requires `resources > 0`.
fn row<'i>(resources: usize) -> impl Parser<&'i str, Vec<u64>, ErrMode<ContextError>> {
    move |input: &mut &'i str| -> ModalResult<Vec<u64>> {
        opt_inline_ws.parse_next(input)?;
        let mut values = vec![units.parse_next(input)?];
        for _ in 1..resources {
            comma.parse_next(input)?;
            values.push(units.parse_next(input)?);
        }
        end_of_record.parse_next(input)?;
        Ok(values)
    }
}

/// `processes` rows, each optionally preceded by trivia.
fn table(
    input: &mut &str,
    processes: usize,
    resources: usize,
    label: &'static str,
) -> ModalResult<Vec<Vec<u64>>> {
    let mut rows = Vec::new();
    for _ in 0..processes {
        trivia.parse_next(input)?;
        rows.push(
            row(resources)
                .context(StrContext::Label(label))
                .parse_next(input)?,
        );
    }
    Ok(rows)
}

/// Rows of a scenario without resource classes: `processes` empty rows,
/// none of which occupies a line.
fn empty_table(input: &mut &str, processes: usize) -> ModalResult<Vec<Vec<u64>>> {
    let mut rows = Vec::new();
    if rows.try_reserve_exact(processes).is_err() {
        return fail
            .context(StrContext::Label("process count"))
            .parse_next(input);
    }
    rows.resize(processes, Vec::new());
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Scenario parser
// ---------------------------------------------------------------------------

fn scenario_parser(input: &mut &str) -> ModalResult<Scenario> {
    trivia.parse_next(input)?;
    let (processes, total_units) = header.context(StrContext::Label("header")).parse_next(input)?;
    let resources = total_units.len();

    let (allocation, request) = if resources == 0 {
        (empty_table(input, processes)?, empty_table(input, processes)?)
    } else {
        (
            table(input, processes, resources, "allocation row")?,
            table(input, processes, resources, "request row")?,
        )
    };

    trivia.parse_next(input)?;
    opt_inline_ws.parse_next(input)?;
    eof.context(StrContext::Expected(StrContextValue::Description(
        "end of input",
    )))
    .parse_next(input)?;

    Ok(Scenario::new(total_units, allocation, request))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
