// Structural validation of the input tables.

use crate::viz::*;

/// Checks that every required column is present in the header and returns the
/// position of each, in the order requested. Extra columns are permitted and
/// ignored downstream.
///
/// The check is purely structural. Value types are handled downstream by the
/// typed parsers, not here.
pub fn resolve_required_columns(
    kind: &str,
    header: &[String],
    required: &[&str],
) -> VizResult<Vec<usize>> {
    let mut indexes: Vec<usize> = Vec::new();
    let mut missing = false;
    for name in required.iter() {
        match header.iter().position(|h| h == name) {
            Some(idx) => indexes.push(idx),
            None => {
                missing = true;
            }
        }
    }
    if missing {
        let mut req: Vec<String> = required.iter().map(|s| s.to_string()).collect();
        req.sort();
        return SchemaSnafu {
            kind,
            required: req,
            present: header.to_vec(),
        }
        .fail();
    }
    Ok(indexes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn accepts_all_required_plus_extras() {
        let h = header(&["extra", "time", "category", "value"]);
        let idx = resolve_required_columns("Bar race", &h, &["time", "category", "value"]).unwrap();
        assert_eq!(idx, vec![1, 2, 3]);
    }

    #[test]
    fn rejects_a_missing_column_and_names_it() {
        let h = header(&["time", "category"]);
        let err = resolve_required_columns("Bar race", &h, &["time", "category", "value"])
            .unwrap_err();
        match err {
            VizError::Schema {
                required, present, ..
            } => {
                assert_eq!(required, vec!["category", "time", "value"]);
                assert_eq!(present, vec!["time", "category"]);
            }
            other => panic!("expected a schema error, got {:?}", other),
        }
    }
}
