use materia_core::format::OutputFormat;

/// Parse output format from string
pub fn parse_output_format(s: &str) -> std::result::Result<OutputFormat, String> {
    s.parse::<OutputFormat>().map_err(|e| e.to_string())
}

/// Parse a minimum similarity score (0-100)
pub fn parse_min_similarity(s: &str) -> std::result::Result<u32, String> {
    let value: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a whole number", s))?;
    if value > 100 {
        return Err(format!("{} is out of range (expected 0-100)", value));
    }
    Ok(value)
}

/// Parse a result limit (at least 1)
pub fn parse_max_results(s: &str) -> std::result::Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a whole number", s))?;
    if value == 0 {
        return Err("expected at least 1".to_string());
    }
    Ok(value)
}
