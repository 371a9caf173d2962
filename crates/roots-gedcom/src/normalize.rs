//! Continuation normalizer
//!
//! Folds `CONC` (concatenate) and `CONT` (newline) lines into the value of
//! their owner: the nearest preceding non-continuation line exactly one
//! level up. Continuations at any other level are passed through untouched
//! and do not become owners themselves.

use crate::line::{GedcomLine, CONC};

/// Merge continuation lines into their owners
#[must_use]
pub fn normalize(lines: Vec<GedcomLine>) -> Vec<GedcomLine> {
    let mut out: Vec<GedcomLine> = Vec::with_capacity(lines.len());
    let mut owner: Option<usize> = None;

    for line in lines {
        if !line.is_continuation() {
            owner = Some(out.len());
            out.push(line);
            continue;
        }

        let Some(target) = owner
            .and_then(|idx| out.get_mut(idx))
            .filter(|target| target.level + 1 == line.level)
        else {
            out.push(line);
            continue;
        };

        let mut value = target.value.take().unwrap_or_default();
        if line.tag != CONC {
            value.push('\n');
        }
        value.push_str(line.value_str());
        target.value = Some(value);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::tokenize;
    use pretty_assertions::assert_eq;

    fn norm(text: &str) -> Vec<GedcomLine> {
        normalize(tokenize(text).value)
    }

    #[test]
    fn conc_and_cont_fold_into_owner() {
        let lines = norm("1 NOTE Hello\n2 CONC  world\n2 CONT Second line\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].value.as_deref(), Some("Hello world\nSecond line"));
    }

    #[test]
    fn empty_cont_adds_blank_line() {
        let lines = norm("1 NOTE a\n2 CONT\n2 CONT b\n");
        assert_eq!(lines[0].value.as_deref(), Some("a\n\nb"));
    }

    #[test]
    fn wrong_level_continuation_passes_through() {
        let lines = norm("1 NOTE a\n3 CONC x\n2 CONC b\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].value.as_deref(), Some("ab"));
        assert_eq!(lines[1].tag, "CONC");
        assert_eq!(lines[1].level, 3);
    }

    #[test]
    fn owner_with_no_value_gets_one() {
        let lines = norm("0 @N1@ NOTE\n1 CONC text\n");
        assert_eq!(lines[0].value.as_deref(), Some("text"));
    }

    #[test]
    fn non_continuations_are_untouched() {
        let lines = norm("0 @I1@ INDI\n1 NAME John /Smith/\n1 SEX M\n");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].value.as_deref(), Some("John /Smith/"));
    }
}
