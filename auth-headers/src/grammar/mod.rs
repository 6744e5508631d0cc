use pest::{
    Parser,
    error::InputLocation,
    iterators::{Pair, Pairs},
};
use pest_derive::Parser;

use crate::{
    error::{HeaderError, Result},
    params::ParamMap,
};

#[derive(Parser)]
#[grammar = "./grammar/auth.pest"]
struct AuthParser;

/// A header value split into its scheme and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeader {
    /// Scheme as it appeared on the wire.
    pub scheme: String,
    pub body: AuthBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthBody {
    Empty,
    Token68(String),
    Params(ParamMap),
}

impl AuthHeader {
    pub fn is_scheme(&self, scheme: &str) -> bool {
        self.scheme.eq_ignore_ascii_case(scheme)
    }
}

pub(crate) fn parse_auth_header(input: &str) -> Result<AuthHeader> {
    let mut pairs =
        AuthParser::parse(Rule::auth_header, input).map_err(|e| syntax_error(input, &e))?;

    let header = pairs
        .next()
        .ok_or_else(|| HeaderError::parse(input, "empty header value"))?;
    assert_rule(&header, Rule::auth_header, input)?;

    build_header(header.into_inner(), input)
}

fn build_header(mut inner: Pairs<'_, Rule>, input: &str) -> Result<AuthHeader> {
    let scheme = inner
        .next()
        .ok_or_else(|| HeaderError::parse(input, "missing authentication scheme"))?;
    assert_rule(&scheme, Rule::scheme, input)?;

    let body = match inner.next() {
        None => AuthBody::Empty,
        Some(pair) => match pair.as_rule() {
            Rule::EOI => AuthBody::Empty,
            Rule::token68 => AuthBody::Token68(pair.as_str().to_string()),
            Rule::auth_params => AuthBody::Params(build_params(pair, input)?),
            other => {
                return Err(HeaderError::parse(
                    pair.as_str(),
                    format!("unexpected rule {other:?}"),
                ));
            }
        },
    };

    Ok(AuthHeader {
        scheme: scheme.as_str().to_string(),
        body,
    })
}

fn build_params(pair: Pair<'_, Rule>, input: &str) -> Result<ParamMap> {
    let mut params = ParamMap::new();

    for param in pair.into_inner() {
        assert_rule(&param, Rule::auth_param, input)?;
        let fragment = param.as_str();
        let mut inner = param.into_inner();

        let name = inner
            .next()
            .ok_or_else(|| HeaderError::parse(fragment, "missing parameter name"))?;
        let value = inner
            .next()
            .ok_or_else(|| HeaderError::parse(fragment, "missing parameter value"))?;

        let value = match value.as_rule() {
            Rule::param_token => value.as_str().to_string(),
            Rule::quoted_string => unescape(value),
            other => {
                return Err(HeaderError::parse(
                    fragment,
                    format!("unexpected rule {other:?}"),
                ));
            }
        };

        params.insert(name.as_str(), value);
    }

    Ok(params)
}

fn unescape(quoted: Pair<'_, Rule>) -> String {
    let mut value = String::with_capacity(quoted.as_str().len());
    for part in quoted.into_inner() {
        match part.as_rule() {
            Rule::escaped => value.push_str(&part.as_str()[1..]),
            _ => value.push_str(part.as_str()),
        }
    }
    value
}

fn assert_rule(pair: &Pair<'_, Rule>, expected: Rule, input: &str) -> Result<()> {
    if pair.as_rule() == expected {
        Ok(())
    } else {
        Err(HeaderError::parse(
            input,
            format!("expected {expected:?}, found {:?}", pair.as_rule()),
        ))
    }
}

/// Reports the list element in which pest gave up, so callers see
/// `realm="abc` rather than the whole header or an empty tail.
fn syntax_error(input: &str, error: &pest::error::Error<Rule>) -> HeaderError {
    let pos = match error.location {
        InputLocation::Pos(pos) => pos,
        InputLocation::Span((start, _)) => start,
    }
    .min(input.len());

    let head = input.get(..pos).unwrap_or(input);
    let start = head.rfind(',').map_or(0, |idx| idx + 1);
    let fragment = input.get(start..).unwrap_or(input).trim();

    HeaderError::parse(fragment, error.variant.message())
}
