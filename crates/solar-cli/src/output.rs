//! Output formatting module

use solar_types::{OutputFormat, Recommendation, Result, ValidationError};
use std::fmt::Write;

pub fn output_recommendation(output_format: OutputFormat, rec: &Recommendation) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(rec)?;
        println!("{}", content);
    } else {
        print!("{}", format_recommendation(rec));
    }

    Ok(())
}

pub fn output_rejection(
    output_format: OutputFormat,
    source: &str,
    err: &ValidationError,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        let value = serde_json::json!({
            "image": source,
            "rejected": true,
            "code": err.code(),
            "reason": err.to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("\nImage Rejected");
        println!("==============");
        println!("Image:   {}", source);
        println!("Code:    {}", err.code());
        println!("Reason:  {}", err);
    }

    Ok(())
}

fn format_payback(years: f64) -> String {
    if years.is_finite() {
        format!("{:.1} years", years)
    } else {
        "never".to_string()
    }
}

/// Table rendering of a recommendation
pub fn format_recommendation(rec: &Recommendation) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_recommendation(&mut out, rec);
    out
}

fn write_recommendation(out: &mut String, rec: &Recommendation) -> std::fmt::Result {
    let stats = &rec.statistics;
    let solar = &rec.solar;
    let fin = &rec.financial;

    writeln!(out, "\nSolar Assessment")?;
    writeln!(out, "================")?;
    writeln!(
        out,
        "Suitable:        {}",
        if rec.suitable { "Yes" } else { "No" }
    )?;
    writeln!(out, "Confidence:      {:.0}%", rec.confidence * 100.0)?;

    writeln!(out, "\n--- Image ---")?;
    writeln!(out, "Resolution:      {}x{}", stats.width, stats.height)?;
    writeln!(out, "Brightness:      {:.1}", stats.brightness)?;
    writeln!(out, "Contrast:        {:.1}", stats.contrast)?;

    writeln!(out, "\n--- System ---")?;
    writeln!(out, "Roof area:       {} sqft", solar.roof_area_sqft)?;
    writeln!(out, "Panels:          {}", solar.max_panels)?;
    writeln!(
        out,
        "Panel type:      {} ({:.0}% efficiency)",
        solar.panel_type,
        solar.panel_spec.efficiency * 100.0
    )?;
    writeln!(out, "Capacity:        {:.1} kW", solar.capacity_kw)?;
    writeln!(out, "Annual output:   {:.0} kWh", solar.annual_kwh)?;
    writeln!(out, "Daily output:    {:.1} kWh", solar.daily_kwh)?;
    if (rec.location_factor - 1.0).abs() > f64::EPSILON {
        writeln!(out, "Location factor: {:.2}", rec.location_factor)?;
    }

    writeln!(out, "\n--- Financials ---")?;
    writeln!(out, "System cost:     ${:.2}", fin.system_cost)?;
    writeln!(out, "Net cost:        ${:.2}", fin.net_cost)?;
    writeln!(out, "Annual savings:  ${:.2}", fin.annual_savings)?;
    writeln!(out, "Payback:         {}", format_payback(fin.payback_years))?;
    writeln!(out, "25-year savings: ${:.2}", fin.total_25yr_savings)?;
    writeln!(out, "ROI:             {:.1}%", fin.roi_percentage)?;

    writeln!(out, "\nRecommendations:")?;
    for message in &rec.messages {
        writeln!(out, "- {}", message)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use solar_app::app::SolarAnalyzer;
    use solar_types::ImageStatistics;

    fn large_roof() -> Recommendation {
        SolarAnalyzer::default()
            .analyze_statistics(ImageStatistics::new(2000, 1000, 150.0, 40.0), 1.0)
            .unwrap()
    }

    #[test]
    fn test_table_lists_estimate_and_messages() {
        let rec = large_roof();
        let text = format_recommendation(&rec);

        assert!(text.contains("Suitable:        No"));
        assert!(text.contains("Roof area:       102588 sqft"));
        assert!(text.contains("Panels:          3847"));
        assert!(text.contains("Monocrystalline"));
        for message in &rec.messages {
            assert!(text.contains(message.as_str()));
        }
        assert!(!text.contains("Location factor:"));
    }

    #[test]
    fn test_payback_formatting() {
        assert_eq!(format_payback(7.34), "7.3 years");
        assert_eq!(format_payback(f64::INFINITY), "never");
    }

    #[test]
    fn test_non_default_location_factor_is_shown() {
        let rec = SolarAnalyzer::default()
            .analyze_statistics(ImageStatistics::new(2000, 1000, 150.0, 40.0), 1.25)
            .unwrap();
        assert!(format_recommendation(&rec).contains("Location factor: 1.25"));
    }
}
