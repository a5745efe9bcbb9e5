//! Deterministic sort rules shared by the dropdown and automation projections.

use std::cmp::Ordering;
use std::sync::OnceLock;

use regex::Regex;

/// Naming scheme of a volatility index code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndexSeries {
    /// `1HZ{N}V`, one tick per second.
    OneSecond,
    /// `R_{N}`.
    Standard,
}

/// Sort key extracted from a volatility index code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VolatilityKey {
    pub series: IndexSeries,
    pub level: u64,
}

impl VolatilityKey {
    /// Extracts the numeric level from `1HZ{N}V` or `R_{N}` codes. Codes
    /// matching neither pattern, or carrying a zero level, have no key.
    pub fn parse(code: &str) -> Option<Self> {
        let (series, captures) = if let Some(captures) = one_second_pattern().captures(code) {
            (IndexSeries::OneSecond, captures)
        } else {
            (IndexSeries::Standard, standard_pattern().captures(code)?)
        };

        let level = captures.get(1)?.as_str().parse::<u64>().ok()?;
        (level > 0).then_some(Self { series, level })
    }
}

fn one_second_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"1HZ(\d+)V").expect("one-second pattern is valid"))
}

fn standard_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"R_(\d+)").expect("standard pattern is valid"))
}

/// Whether a submarket holds numerically named volatility indices.
pub fn is_volatility_submarket(id: &str, display_name: &str) -> bool {
    id == "random_index"
        || display_name.contains("Continuous Indices")
        || display_name.contains("Volatility")
        || id.contains("volatility")
}

/// Total order for symbols in a volatility submarket.
///
/// Keyed codes come first, grouped by series and then ascending level. Codes
/// without a key follow, ordered by `tie_break` text. Code comparison settles
/// any remaining tie.
pub fn compare_volatility(
    a_code: &str,
    a_tie_break: &str,
    b_code: &str,
    b_tie_break: &str,
) -> Ordering {
    match (VolatilityKey::parse(a_code), VolatilityKey::parse(b_code)) {
        (Some(a), Some(b)) => a.cmp(&b).then_with(|| a_code.cmp(b_code)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a_tie_break
            .cmp(b_tie_break)
            .then_with(|| a_code.cmp(b_code)),
    }
}

/// Stable-sorts `items` by [`compare_volatility`].
pub fn sort_volatility<T, C, B>(items: &mut [T], code: C, tie_break: B)
where
    C: Fn(&T) -> &str,
    B: Fn(&T) -> &str,
{
    items.sort_by(|a, b| compare_volatility(code(a), tie_break(a), code(b), tie_break(b)));
}

/// Moves entries matching `pinned` to the front, keeping relative order.
pub fn pin_first<T, P>(items: &mut [T], pinned: P)
where
    P: Fn(&T) -> bool,
{
    items.sort_by_key(|item| !pinned(item));
}

/// Moves closed entries behind open ones, keeping relative order within each
/// group.
pub fn closed_last<T, F>(items: &mut [T], closed: F)
where
    F: Fn(&T) -> bool,
{
    items.sort_by_key(|item| closed(item));
}
