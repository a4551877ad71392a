//! Setting value validation.

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "MAGIC_ZEBRA_CONTENT_WIDTH_MM" => {
            let v: f64 = value.parse().map_err(|_| "must be a number")?;
            if !(v > 0.0 && v <= 1000.0) {
                return Err("must be greater than 0 and at most 1000".into());
            }
        }
        "MAGIC_ZEBRA_RIGHT_MARGIN_MM" => validate_float_range(value, 0.0, 100.0)?,
        "MAGIC_ZEBRA_DENSITY" => validate_int_range(value, 72, 1200)?,
        "MAGIC_ZEBRA_MONO" => {
            if !["threshold", "dither", "none"].contains(&value) {
                return Err("must be threshold, dither, or none".into());
            }
        }
        "MAGIC_ZEBRA_THRESHOLD" => validate_float_range(value, 0.0, 1.0)?,
        "MAGIC_ZEBRA_WIDTH_TOLERANCE_PTS" => validate_float_range(value, 0.0, 10.0)?,
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: u32, max: u32) -> Result<(), String> {
    let v: u32 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

fn validate_float_range(value: &str, min: f64, max: f64) -> Result<(), String> {
    let v: f64 = value.parse().map_err(|_| "must be a number")?;
    if !(min..=max).contains(&v) {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}
