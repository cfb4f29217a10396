use crate::error::{Error, Result};

/// Apple model code that shows up in some listings and only pollutes the search.
const SKIPPED_MODEL_CODE: &str = "MGND3HN";
const LAPTOP_MARKER: &str = "Laptop";

/// Build a search string from a free-text laptop model.
///
/// The query is the brand (first token) followed by a bracketed group, e.g.
/// `(Core i5 11th Gen/ 8 GB/ ...)` contributes `Core i5 11th Gen`. Brackets,
/// slashes and commas are stripped.
///
/// The group is the one holding the first token that ends in `/`, so an
/// earlier group such as `(2021)` in `VivoBook 15 (2021) Thin and Light Laptop
/// (Core i3 10th Gen/ 8 GB)` is passed over. A group with no `/` in it is only
/// used when no later token ends in `/`, and then it stops at the first `)`.
///
/// Apple listings put the model name in front of the `Laptop` token
/// (`Apple MacBook Air M1 Laptop (Apple M1/ ...)`), so for Apple those tokens
/// are kept as well, minus the model code. Apple groups stop at the first `/`
/// or `)`, since `Laptop / Retina` often trails the bracket.
///
/// # Errors
/// Errors if the model is blank, has no bracketed group, or is an Apple model
/// without a `Laptop` token.
pub fn derive_query(model: &str) -> Result<String> {
    let fail = |reason| Error::QueryDerivation {
        model: model.to_string(),
        reason,
    };

    let tokens: Vec<&str> = model.split_whitespace().collect();
    let brand = *tokens.first().ok_or_else(|| fail("empty model"))?;

    let (open, close) = bracket_group(&tokens, brand == "Apple")
        .ok_or_else(|| fail("no bracketed group closed by '/' or ')'"))?;

    let mut query = vec![brand];

    if brand == "Apple" {
        let laptop = tokens
            .iter()
            .position(|t| *t == LAPTOP_MARKER)
            .ok_or_else(|| fail("Apple model without a 'Laptop' token"))?;
        if laptop < open {
            query.extend(
                tokens[1..laptop]
                    .iter()
                    .copied()
                    .filter(|t| *t != SKIPPED_MODEL_CODE),
            );
        }
    }

    query.extend(
        tokens[open..=close]
            .iter()
            .map(|t| t.trim_matches(|c: char| matches!(c, '(' | ')' | '/' | ',')))
            .filter(|t| !t.is_empty() && *t != SKIPPED_MODEL_CODE),
    );

    Ok(query.join(" "))
}

/// Token range `(open, close)` of the bracketed group to search for.
fn bracket_group(tokens: &[&str], stop_at_paren: bool) -> Option<(usize, usize)> {
    let first_open = tokens.iter().position(|t| t.starts_with('('))?;
    let after = |pred: fn(&str) -> bool| {
        tokens[first_open..]
            .iter()
            .position(|t| pred(t))
            .map(|i| first_open + i)
    };

    if stop_at_paren {
        return after(|t| t.ends_with('/') || t.ends_with(')')).map(|close| (first_open, close));
    }

    match after(|t| t.ends_with('/')) {
        Some(close) => {
            let open = tokens[first_open..=close]
                .iter()
                .rposition(|t| t.starts_with('('))
                .map_or(first_open, |i| first_open + i);
            Some((open, close))
        }
        None => after(|t| t.ends_with(')')).map(|close| (first_open, close)),
    }
}

/// The search URL for a query: `base` followed by the form-encoded query.
pub fn search_url(base: &str, query: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("{}{}", base, encoded)
}
