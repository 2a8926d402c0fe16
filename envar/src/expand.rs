//! `${NAME}` expansion against an environment

use crate::env::Environment;

/// Why expansion gave up on a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ExpandError {
    /// Still changing after every allowed substitution pass.
    Unsettled { passes: usize },
    /// A pass produced more than the allowed number of bytes.
    TooLarge { limit: usize },
}

/// Expand `${NAME}` placeholders in `value` until a pass changes nothing.
///
/// Placeholders naming unset variables are kept verbatim, as are empty
/// (`${}`) and unterminated ones. Substituted text is scanned again on the
/// next pass, so a variable whose value holds further placeholders resolves
/// through them.
///
/// `max_passes` is the number of substituting passes allowed; a value that
/// settles after exactly `max_passes` substitutions is accepted. No pass may
/// grow the value beyond `max_len` bytes (or the input's own length, if
/// that is larger).
pub(crate) fn expand(
    value: &str,
    env: &dyn Environment,
    max_passes: usize,
    max_len: usize,
) -> Result<String, ExpandError> {
    let limit = max_len.max(value.len());
    let mut current = value.to_string();

    for pass in 0..=max_passes {
        let next = expand_once(&current, env, limit).ok_or(ExpandError::TooLarge { limit })?;
        if next == current {
            return Ok(current);
        }
        if pass == max_passes {
            break;
        }
        current = next;
    }
    Err(ExpandError::Unsettled { passes: max_passes })
}

/// One substitution pass, or `None` as soon as the output exceeds `limit`.
fn expand_once(value: &str, env: &dyn Environment, limit: usize) -> Option<String> {
    let mut out = String::with_capacity(value.len().min(limit));
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return (out.len() <= limit).then_some(out);
        };

        let name = &after[..end];
        match (!name.is_empty()).then(|| env.get(name)).flatten() {
            Some(replacement) => {
                if out.len() + replacement.len() > limit {
                    return None;
                }
                out.push_str(&replacement);
            }
            None => out.push_str(&rest[start..start + 2 + end + 1]),
        }
        if out.len() > limit {
            return None;
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    (out.len() <= limit).then_some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MemoryEnv;

    const LIMIT: usize = 1024 * 1024;

    #[test]
    fn test_expand_multiple_placeholders() {
        let env = MemoryEnv::from_iter([("A", "x"), ("B", "y")]);
        assert_eq!(expand("${A}/${B}", &env, 16, LIMIT).unwrap(), "x/y");
    }

    #[test]
    fn test_expand_keeps_undefined_placeholder() {
        let env = MemoryEnv::from_iter([("A", "x")]);
        assert_eq!(
            expand("${A}/${UNDEFINED}", &env, 16, LIMIT).unwrap(),
            "x/${UNDEFINED}"
        );
    }

    #[test]
    fn test_expand_resolves_nested_values() {
        let env = MemoryEnv::from_iter([
            ("ROOT", "/srv"),
            ("DATA", "${ROOT}/data"),
            ("CACHE", "${DATA}/cache"),
        ]);
        assert_eq!(expand("${CACHE}", &env, 16, LIMIT).unwrap(), "/srv/data/cache");
    }

    #[test]
    fn test_expand_leaves_plain_text_alone() {
        let env = MemoryEnv::new();
        assert_eq!(expand("no placeholders", &env, 16, LIMIT).unwrap(), "no placeholders");
        assert_eq!(expand("$HOME and {braces}", &env, 16, LIMIT).unwrap(), "$HOME and {braces}");
        assert_eq!(expand("", &env, 16, LIMIT).unwrap(), "");
    }

    #[test]
    fn test_expand_keeps_empty_and_unterminated_placeholders() {
        let env = MemoryEnv::from_iter([("A", "x")]);
        assert_eq!(expand("${}", &env, 16, LIMIT).unwrap(), "${}");
        assert_eq!(expand("${A}${A", &env, 16, LIMIT).unwrap(), "x${A");
    }

    #[test]
    fn test_expand_variable_set_to_empty_string() {
        let env = MemoryEnv::from_iter([("EMPTY", "")]);
        assert_eq!(expand("a${EMPTY}b", &env, 16, LIMIT).unwrap(), "ab");
    }

    #[test]
    fn test_expand_self_reference_is_cyclic() {
        let env = MemoryEnv::from_iter([("LOOP", "${LOOP}x")]);
        assert_eq!(expand("${LOOP}", &env, 8, LIMIT), Err(ExpandError::Unsettled { passes: 8 }));
    }

    #[test]
    fn test_expand_mutual_reference_is_cyclic() {
        let env = MemoryEnv::from_iter([("PING", "${PONG}"), ("PONG", "${PING}")]);
        assert!(expand("${PING}", &env, 4, LIMIT).is_err());
    }

    #[test]
    fn test_expand_chain_needing_exactly_max_passes() {
        let env = MemoryEnv::from_iter([("C", "${B}"), ("B", "${A}"), ("A", "x")]);
        assert_eq!(expand("${C}", &env, 3, LIMIT).unwrap(), "x");
        assert_eq!(
            expand("${C}", &env, 2, LIMIT),
            Err(ExpandError::Unsettled { passes: 2 })
        );
    }

    #[test]
    fn test_expand_single_pass() {
        let env = MemoryEnv::from_iter([("A", "x")]);
        assert_eq!(expand("${A}", &env, 1, LIMIT).unwrap(), "x");
    }

    #[test]
    fn test_expand_zero_passes() {
        let env = MemoryEnv::from_iter([("A", "x")]);
        assert_eq!(expand("plain", &env, 0, LIMIT).unwrap(), "plain");
        assert_eq!(expand("${MISSING}", &env, 0, LIMIT).unwrap(), "${MISSING}");
        assert_eq!(
            expand("${A}", &env, 0, LIMIT),
            Err(ExpandError::Unsettled { passes: 0 })
        );
    }

    #[test]
    fn test_expand_growth_stops_at_limit() {
        let env = MemoryEnv::from_iter([("A", "${A}${A}${A}${A}")]);
        assert_eq!(
            expand("${A}", &env, 16, 4096),
            Err(ExpandError::TooLarge { limit: 4096 })
        );
    }

    #[test]
    fn test_expand_single_large_replacement() {
        let big = "x".repeat(100);
        let env = MemoryEnv::from_iter([("BIG", big.as_str())]);
        assert_eq!(
            expand("${BIG}", &env, 16, 64),
            Err(ExpandError::TooLarge { limit: 64 })
        );
        assert_eq!(expand("${BIG}", &env, 16, 100).unwrap(), big);
    }

    #[test]
    fn test_expand_limit_never_rejects_unexpanded_input() {
        let env = MemoryEnv::new();
        let long = "y".repeat(200);
        assert_eq!(expand(&long, &env, 16, 64).unwrap(), long);
    }
}
