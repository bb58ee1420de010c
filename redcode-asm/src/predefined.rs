//! Predefined, case-insensitive identifiers available to every expression.

use crate::options::AssembleOptions;

/// Look up a predefined identifier's value.
///
/// `curline` is the 0-based index of the instruction currently being
/// assembled; it backs the `CURLINE` identifier and is otherwise unused.
#[must_use]
pub fn lookup(name: &str, options: &AssembleOptions, curline: i64) -> Option<i64> {
    match name.to_ascii_uppercase().as_str() {
        "CORESIZE" => Some(i64::from(options.core_size)),
        "MAXPROCESSES" => Some(i64::from(options.max_processes)),
        "MAXCYCLES" => Some(i64::from(options.max_cycles)),
        "MAXLENGTH" => i64::try_from(options.max_length).ok(),
        "MINDISTANCE" => Some(i64::from(options.min_separation)),
        "VERSION" => Some(96),
        "WARRIORS" => Some(i64::from(options.warriors)),
        "ROUNDS" => Some(i64::from(options.rounds)),
        "PSPACESIZE" => Some(i64::from(options.effective_pspace_size())),
        "READLIMIT" => Some(i64::from(options.read_limit)),
        "WRITELIMIT" => Some(i64::from(options.write_limit)),
        "CURLINE" => Some(curline),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use coverage_helper::test;

    use super::lookup;
    use crate::options::AssembleOptions;

    #[test]
    fn resolves_case_insensitively() {
        let opts = AssembleOptions::default();
        assert_eq!(lookup("coresize", &opts, 0), Some(8000));
        assert_eq!(lookup("CoreSize", &opts, 0), Some(8000));
        assert_eq!(lookup("VERSION", &opts, 0), Some(96));
    }

    #[test]
    fn curline_tracks_argument() {
        let opts = AssembleOptions::default();
        assert_eq!(lookup("CURLINE", &opts, 7), Some(7));
    }

    #[test]
    fn unknown_identifier_is_none() {
        let opts = AssembleOptions::default();
        assert_eq!(lookup("NOTREAL", &opts, 0), None);
    }
}
