//! Query predicate builder.
//!
//! Turns a [`SearchSpec`] into a composable boolean predicate over
//! [`Product`]. The predicate is a plain tagged tree: the in-memory
//! evaluator here defines the semantics, and the Postgres repository
//! translates the same tree into SQL. Both the result page and the total
//! count are produced from one predicate value, so pagination metadata can
//! never drift from the returned rows.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::domain::products::{models::Product, search::SearchSpec};

static PHRASE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]+)""#).expect("valid pattern"));

static AND_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i) AND ").expect("valid pattern"));

static OR_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i) OR ").expect("valid pattern"));

/// How the terms of a text query combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchOperator {
    #[default]
    And,
    Or,
}

/// A parsed free-text query: exact phrases plus loose terms under one
/// operator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextQuery {
    pub operator: SearchOperator,
    pub terms: Vec<String>,
    pub phrases: Vec<String>,
}

/// A boolean filter over a [`Product`].
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches everything; the identity for [`Predicate::And`].
    True,
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Compare(Comparison),
    /// Case-insensitive substring match against name, description, brand
    /// and type. The needle is stored lowercased.
    TextContains(String),
}

/// A structural field comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    BrandIn(Vec<String>),
    TypeIn(Vec<String>),
    PriceAtLeast(Decimal),
    PriceAtMost(Decimal),
    InStock,
}

impl Predicate {
    /// Evaluate the predicate against a product.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Predicate::True => true,
            Predicate::And(children) => children.iter().all(|c| c.matches(product)),
            Predicate::Or(children) => children.iter().any(|c| c.matches(product)),
            Predicate::Compare(comparison) => comparison.matches(product),
            Predicate::TextContains(needle) => {
                product.name.to_lowercase().contains(needle)
                    || product.description.to_lowercase().contains(needle)
                    || product.brand.to_lowercase().contains(needle)
                    || product.product_type.to_lowercase().contains(needle)
            }
        }
    }
}

impl Comparison {
    fn matches(&self, product: &Product) -> bool {
        match self {
            Comparison::BrandIn(brands) => brands.contains(&product.brand),
            Comparison::TypeIn(types) => types.contains(&product.product_type),
            Comparison::PriceAtLeast(min) => product.price >= *min,
            Comparison::PriceAtMost(max) => product.price <= *max,
            Comparison::InStock => product.quantity_in_stock > 0,
        }
    }
}

/// Build the search predicate for a specification.
///
/// Absent filters contribute nothing; a specification with no filters at all
/// yields [`Predicate::True`].
#[must_use]
pub fn build(spec: &SearchSpec) -> Predicate {
    let mut clauses = Vec::new();

    if let Some(search) = spec.search.as_deref()
        && !search.trim().is_empty()
    {
        clauses.push(text_predicate(&parse_text_query(search)));
    }

    if !spec.brands.is_empty() {
        clauses.push(Predicate::Compare(Comparison::BrandIn(spec.brands.clone())));
    }

    if !spec.types.is_empty() {
        clauses.push(Predicate::Compare(Comparison::TypeIn(spec.types.clone())));
    }

    if let Some(min) = spec.min_price {
        clauses.push(Predicate::Compare(Comparison::PriceAtLeast(min)));
    }

    if let Some(max) = spec.max_price {
        clauses.push(Predicate::Compare(Comparison::PriceAtMost(max)));
    }

    if spec.in_stock_only {
        clauses.push(Predicate::Compare(Comparison::InStock));
    }

    combine(clauses, SearchOperator::And)
}

/// Parse a raw search string.
///
/// Quoted substrings become exact phrases and are stripped before the
/// operator split. The remainder splits on the literal token ` AND `
/// (case-insensitive, all terms must match) or ` OR ` (any term matches);
/// with neither present it splits on whitespace with every term required.
#[must_use]
pub fn parse_text_query(search: &str) -> TextQuery {
    let mut query = TextQuery::default();

    if search.trim().is_empty() {
        return query;
    }

    for capture in PHRASE.captures_iter(search) {
        if let Some(phrase) = capture.get(1) {
            query.phrases.push(phrase.as_str().to_owned());
        }
    }

    let remaining = PHRASE.replace_all(search, "");

    let raw_terms: Vec<&str> = if AND_SPLIT.is_match(&remaining) {
        query.operator = SearchOperator::And;
        AND_SPLIT.split(&remaining).collect()
    } else if OR_SPLIT.is_match(&remaining) {
        query.operator = SearchOperator::Or;
        OR_SPLIT.split(&remaining).collect()
    } else {
        query.operator = SearchOperator::And;
        remaining.split_whitespace().collect()
    };

    query.terms = raw_terms
        .into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect();

    query
}

/// Lowercased, de-duplicated search terms for the suggestion/analytics
/// surface. One-character words are dropped.
#[must_use]
pub fn search_terms(search: Option<&str>) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();

    for word in search.unwrap_or_default().split_whitespace() {
        let term = word.trim().to_lowercase();

        if term.chars().count() > 1 && !terms.contains(&term) {
            terms.push(term);
        }
    }

    terms
}

/// Whether `text` matches `term` exactly (substring) or approximately.
///
/// Both inputs are lowercased. Falls back to Levenshtein similarity when no
/// substring match exists; `threshold` is the minimum similarity in 0.0–1.0.
#[must_use]
pub fn is_partial_match(text: &str, term: &str, threshold: f64) -> bool {
    if text.trim().is_empty() || term.trim().is_empty() {
        return false;
    }

    let text = text.to_lowercase();
    let term = term.to_lowercase();

    if text.contains(&term) {
        return true;
    }

    similarity(&text, &term) >= threshold
}

/// Normalised Levenshtein similarity in 0.0–1.0.
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());

    if max_len == 0 {
        return 1.0;
    }

    let distance = levenshtein(a, b);

    1.0 - distance as f64 / max_len as f64
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;

        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);

            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }

        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

fn text_predicate(query: &TextQuery) -> Predicate {
    let nodes: Vec<Predicate> = query
        .phrases
        .iter()
        .chain(query.terms.iter())
        .map(|term| Predicate::TextContains(term.to_lowercase()))
        .collect();

    combine(nodes, query.operator)
}

fn combine(mut nodes: Vec<Predicate>, operator: SearchOperator) -> Predicate {
    match nodes.len() {
        0 => Predicate::True,
        1 => nodes.remove(0),
        _ => match operator {
            SearchOperator::And => Predicate::And(nodes),
            SearchOperator::Or => Predicate::Or(nodes),
        },
    }
}
