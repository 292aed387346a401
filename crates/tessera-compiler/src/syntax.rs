//! Small grammars embedded in attribute text.
//!
//! Variable references such as `!(loc.Title)` or `!(bind.fileVersion.App)`
//! and dotted versions are recognized here. Each `parse_*` entry point
//! requires the whole input to match.

use winnow::{
    Parser as _,
    ascii::digit1,
    combinator::separated,
    error::{ContextError, ErrMode},
    token::{one_of, take_while},
};

type Input<'src> = &'src str;
type IResult<O> = std::result::Result<O, ErrMode<ContextError>>;

/// Largest value of one dotted version part.
pub(crate) const MAX_VERSION_PART: u32 = 65535;

/// A `!(namespace.name)` or `$(namespace.name)` reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct VariableReference<'src> {
    pub(crate) sigil: char,
    pub(crate) namespace: &'src str,
    pub(crate) name: &'src str,
}

impl VariableReference<'_> {
    /// `!(loc.Name)`
    pub(crate) fn is_localization(&self) -> bool {
        self.sigil == '!' && self.namespace == "loc"
    }

    /// `!(loc.Name)`, `$(loc.Name)` or `!(wix.Name)`, resolved after analysis.
    pub(crate) fn is_deferred_text(&self) -> bool {
        matches!((self.sigil, self.namespace), ('!', "loc") | ('$', "loc") | ('!', "wix"))
    }

    /// `!(bind.name.Scope)` or `!(bindpath.name)`.
    pub(crate) fn is_binder_variable(&self) -> bool {
        match (self.sigil, self.namespace) {
            ('!', "bind") => self.name.contains('.'),
            ('!', "bindpath") => true,
            _ => false,
        }
    }
}

fn variable_name<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '.'),
    )
        .take()
        .parse_next(input)
}

fn variable_reference<'src>(input: &mut Input<'src>) -> IResult<VariableReference<'src>> {
    let sigil = one_of(['!', '$']).parse_next(input)?;
    '('.parse_next(input)?;
    let namespace = take_while(1.., |c: char| c.is_ascii_alphabetic()).parse_next(input)?;
    '.'.parse_next(input)?;
    let name = variable_name.parse_next(input)?;
    ')'.parse_next(input)?;
    Ok(VariableReference {
        sigil,
        namespace,
        name,
    })
}

fn version_part<'src>(input: &mut Input<'src>) -> IResult<u32> {
    digit1
        .try_map(str::parse::<u32>)
        .verify(|part: &u32| *part <= MAX_VERSION_PART)
        .parse_next(input)
}

fn version<'src>(input: &mut Input<'src>) -> IResult<Vec<u32>> {
    separated(1..=4, version_part, '.').parse_next(input)
}

/// Parses a complete variable reference.
pub(crate) fn parse_variable_reference(text: &str) -> Option<VariableReference<'_>> {
    let mut input = text;
    let reference = variable_reference.parse_next(&mut input).ok()?;
    input.is_empty().then_some(reference)
}

/// Parses a complete dotted version of one to four parts.
pub(crate) fn parse_version(text: &str) -> Option<Vec<u32>> {
    let mut input = text;
    let parts = version.parse_next(&mut input).ok()?;
    input.is_empty().then_some(parts)
}
