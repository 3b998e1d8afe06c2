//! Process-wide switch for chatty human output (headers, banners)

use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// Fix the quiet switch for this process; `--quiet` wins over `TICKJOBS_QUIET`.
///
/// Only the first call takes effect.
pub fn init_quiet(flag: bool) -> bool {
    *QUIET.get_or_init(|| flag || quiet_from_env(std::env::var("TICKJOBS_QUIET").ok().as_deref()))
}

pub fn is_quiet() -> bool {
    init_quiet(false)
}

fn quiet_from_env(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        let v = v.trim();
        v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes")
    })
}
