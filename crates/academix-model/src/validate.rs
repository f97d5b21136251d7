//! Input validation mirroring the range constraints the original tool
//! schemas enforced. These run at the façade boundary, before any network
//! call, so a [`crate::AdapterError::Validation`] never triggers a
//! fallback chain or touches the cache.

use crate::error::AdapterError;

fn err(msg: impl Into<String>) -> AdapterError {
    AdapterError::Validation(msg.into())
}

pub fn non_empty(value: &str, field: &str) -> Result<(), AdapterError> {
    if value.trim().is_empty() {
        return Err(err(format!("{field} must not be empty")));
    }
    Ok(())
}

pub fn bounded_len(value: &str, field: &str, min: usize, max: usize) -> Result<(), AdapterError> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(err(format!(
            "{field} must be between {min} and {max} characters, got {len}"
        )));
    }
    Ok(())
}

pub fn limit(value: u32, max: u32) -> Result<(), AdapterError> {
    if value < 1 || value > max {
        return Err(err(format!("limit must be between 1 and {max}, got {value}")));
    }
    Ok(())
}

pub fn year(value: i32, field: &str) -> Result<(), AdapterError> {
    if !(1900..=2100).contains(&value) {
        return Err(err(format!(
            "{field} must be between 1900 and 2100, got {value}"
        )));
    }
    Ok(())
}

pub fn year_range(year_from: Option<i32>, year_to: Option<i32>) -> Result<(), AdapterError> {
    if let Some(from) = year_from {
        year(from, "year_from")?;
    }
    if let Some(to) = year_to {
        year(to, "year_to")?;
    }
    if let (Some(from), Some(to)) = (year_from, year_to) {
        if to < from {
            return Err(err("year_to must be >= year_from"));
        }
    }
    Ok(())
}

pub fn paper_ids(ids: &[String]) -> Result<(), AdapterError> {
    if ids.is_empty() || ids.len() > 50 {
        return Err(err(format!(
            "paper_ids must contain between 1 and 50 entries, got {}",
            ids.len()
        )));
    }
    Ok(())
}

pub fn direction(value: &str) -> Result<(), AdapterError> {
    match value {
        "citing" | "cited" | "both" => Ok(()),
        other => Err(err(format!(
            "direction must be 'citing', 'cited', or 'both', got '{other}'"
        ))),
    }
}

pub fn depth(value: u32) -> Result<(), AdapterError> {
    if value != 1 {
        return Err(err("depth currently only supports 1"));
    }
    Ok(())
}

pub fn max_nodes(value: u32) -> Result<(), AdapterError> {
    if value < 10 || value > 200 {
        return Err(err(format!(
            "max_nodes must be between 10 and 200, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_range_rejects_inverted_bounds() {
        assert!(year_range(Some(2020), Some(2010)).is_err());
        assert!(year_range(Some(2010), Some(2020)).is_ok());
        assert!(year_range(None, None).is_ok());
    }

    #[test]
    fn paper_ids_rejects_empty_and_oversized() {
        assert!(paper_ids(&[]).is_err());
        let too_many: Vec<String> = (0..51).map(|i| i.to_string()).collect();
        assert!(paper_ids(&too_many).is_err());
        assert!(paper_ids(&["1".to_string()]).is_ok());
    }

    #[test]
    fn limit_enforces_range() {
        assert!(limit(0, 100).is_err());
        assert!(limit(101, 100).is_err());
        assert!(limit(1, 100).is_ok());
        assert!(limit(100, 100).is_ok());
    }

    #[test]
    fn direction_rejects_unknown_values() {
        assert!(direction("both").is_ok());
        assert!(direction("sideways").is_err());
    }
}
