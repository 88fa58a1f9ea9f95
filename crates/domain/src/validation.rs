//! Attribute validators
//!
//! Plain predicate functions composed into the rule tables in
//! [`crate::schema`]. Each returns a human-readable message on failure.

/// Value must be one of `allowed` (exact match).
pub fn one_of(value: &str, allowed: &[&str]) -> Result<(), String> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(format!("value must be one of [{}], got \"{value}\"", allowed.join(", ")))
    }
}

/// String must have at least `min` characters.
pub fn length_at_least(value: &str, min: usize) -> Result<(), String> {
    let length = value.chars().count();
    if length >= min {
        Ok(())
    } else {
        Err(format!("length must be at least {min}, got {length}"))
    }
}

/// Optional string: checked only when set.
pub fn optional_length_at_least(value: Option<&str>, min: usize) -> Result<(), String> {
    value.map_or(Ok(()), |v| length_at_least(v, min))
}

pub fn at_least(value: i64, min: i64) -> Result<(), String> {
    if value >= min {
        Ok(())
    } else {
        Err(format!("value must be at least {min}, got {value}"))
    }
}

/// Collection must hold at least `min` elements.
pub fn size_at_least<T>(values: &[T], min: usize) -> Result<(), String> {
    if values.len() >= min {
        Ok(())
    } else {
        Err(format!("must contain at least {min} element(s), got {}", values.len()))
    }
}

/// Collection must hold at most `max` elements.
pub fn size_at_most<T>(values: &[T], max: usize) -> Result<(), String> {
    if values.len() <= max {
        Ok(())
    } else {
        Err(format!("must contain at most {max} element(s), got {}", values.len()))
    }
}

/// Every element of `required` must also appear in `allowed`.
pub fn required_subset_of(
    required: &[String],
    allowed: &[String],
    allowed_name: &str,
) -> Result<(), String> {
    let missing: Vec<&str> = required
        .iter()
        .filter(|item| !allowed.contains(item))
        .map(String::as_str)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(format!("[{}] must also be listed in {allowed_name}", missing.join(", ")))
    }
}

/// No value may appear twice.
pub fn unique<'a>(values: impl IntoIterator<Item = &'a str>) -> Result<(), String> {
    let mut seen: Vec<&str> = Vec::new();
    let mut duplicates: Vec<&str> = Vec::new();
    for value in values {
        if seen.contains(&value) {
            if !duplicates.contains(&value) {
                duplicates.push(value);
            }
        } else {
            seen.push(value);
        }
    }

    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(format!("duplicate values [{}]", duplicates.join(", ")))
    }
}
