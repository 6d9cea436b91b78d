//! Excel export of batch results

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use solar_types::{BatchResults, Error, Result};
use std::path::Path;

fn excel_err(e: XlsxError) -> Error {
    Error::Excel(e.to_string())
}

/// Write Summary, Details and Rejections sheets to `output_path`
pub fn export_to_excel(results: &BatchResults, output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    let summary_sheet = workbook.add_worksheet();
    write_summary_sheet(summary_sheet, results)?;

    let details_sheet = workbook.add_worksheet();
    write_details_sheet(details_sheet, results)?;

    let rejections_sheet = workbook.add_worksheet();
    write_rejections_sheet(rejections_sheet, results)?;

    workbook.save(output_path).map_err(excel_err)?;

    Ok(())
}

fn write_summary_sheet(sheet: &mut Worksheet, results: &BatchResults) -> Result<()> {
    sheet.set_name("Summary").map_err(excel_err)?;

    let header_format = Format::new().set_bold();

    sheet
        .write_string_with_format(0, 0, "Rooftop Solar Analysis Report", &header_format)
        .map_err(excel_err)?;

    let rows: [(&str, f64); 5] = [
        ("Total Images:", results.total_processed as f64),
        ("Analyzed:", results.successful as f64),
        ("Rejected:", results.rejected as f64),
        ("Suitable:", results.suitable_count() as f64),
        (
            "Total Capacity (kW):",
            results
                .entries
                .iter()
                .map(|e| e.recommendation.solar.capacity_kw)
                .sum(),
        ),
    ];

    sheet.write_string(2, 0, "Analysis Date:").map_err(excel_err)?;
    sheet
        .write_string(2, 1, results.started_at.to_rfc3339())
        .map_err(excel_err)?;

    for (offset, (label, value)) in rows.iter().enumerate() {
        let row = 3 + offset as u32;
        sheet.write_string(row, 0, *label).map_err(excel_err)?;
        sheet.write_number(row, 1, *value).map_err(excel_err)?;
    }

    sheet.set_column_width(0, 22).map_err(excel_err)?;
    sheet.set_column_width(1, 28).map_err(excel_err)?;

    Ok(())
}

fn write_details_sheet(sheet: &mut Worksheet, results: &BatchResults) -> Result<()> {
    sheet.set_name("Details").map_err(excel_err)?;

    let header_format = Format::new().set_bold();

    let headers = [
        "File",
        "Width",
        "Height",
        "Brightness",
        "Contrast",
        "Roof Area (sqft)",
        "Panels",
        "Panel Type",
        "Capacity (kW)",
        "Annual (kWh)",
        "System Cost",
        "Net Cost",
        "Annual Savings",
        "Payback (years)",
        "ROI %",
        "Confidence",
        "Suitable",
    ];

    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(excel_err)?;
    }

    for (row_idx, entry) in results.entries.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        let rec = &entry.recommendation;

        let filename = Path::new(&entry.image_path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&entry.image_path);
        sheet.write_string(row, 0, filename).map_err(excel_err)?;

        let numbers = [
            (1, rec.statistics.width as f64),
            (2, rec.statistics.height as f64),
            (3, rec.statistics.brightness),
            (4, rec.statistics.contrast),
            (5, rec.solar.roof_area_sqft as f64),
            (6, rec.solar.max_panels as f64),
            (8, rec.solar.capacity_kw),
            (9, rec.solar.annual_kwh),
            (10, rec.financial.system_cost),
            (11, rec.financial.net_cost),
            (12, rec.financial.annual_savings),
            (14, rec.financial.roi_percentage),
            (15, rec.confidence),
        ];
        for (col, value) in numbers {
            sheet.write_number(row, col, value).map_err(excel_err)?;
        }

        sheet
            .write_string(row, 7, rec.solar.panel_type.label())
            .map_err(excel_err)?;

        if rec.financial.pays_back() {
            sheet
                .write_number(row, 13, rec.financial.payback_years)
                .map_err(excel_err)?;
        } else {
            sheet.write_string(row, 13, "never").map_err(excel_err)?;
        }

        sheet
            .write_string(row, 16, if rec.suitable { "Yes" } else { "No" })
            .map_err(excel_err)?;
    }

    sheet.set_column_width(0, 30).map_err(excel_err)?;

    Ok(())
}

fn write_rejections_sheet(sheet: &mut Worksheet, results: &BatchResults) -> Result<()> {
    sheet.set_name("Rejections").map_err(excel_err)?;

    let header_format = Format::new().set_bold();
    for (col, header) in ["File", "Code", "Reason"].iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(excel_err)?;
    }

    for (row_idx, rejection) in results.rejections.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        sheet
            .write_string(row, 0, &rejection.image_path)
            .map_err(excel_err)?;
        sheet.write_string(row, 1, &rejection.code).map_err(excel_err)?;
        sheet
            .write_string(row, 2, &rejection.reason)
            .map_err(excel_err)?;
    }

    sheet.set_column_width(0, 30).map_err(excel_err)?;
    sheet.set_column_width(2, 60).map_err(excel_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::app::SolarAnalyzer;
    use solar_types::{AnalysisEntry, ImageStatistics, RejectionEntry};
    use tempfile::tempdir;

    #[test]
    fn test_export_writes_workbook() {
        let now = Utc::now();
        let results = BatchResults {
            entries: Vec::new(),
            rejections: vec![RejectionEntry {
                image_path: "dark.png".to_string(),
                code: "too_dark".to_string(),
                reason: "Image is too dark".to_string(),
            }],
            total_processed: 1,
            successful: 0,
            rejected: 1,
            started_at: now,
            completed_at: now,
        };

        let dir = tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        export_to_excel(&results, &path).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }

    #[test]
    fn test_export_entry_without_payback() {
        let rec = SolarAnalyzer::default()
            .analyze_statistics(ImageStatistics::new(2000, 1000, 150.0, 40.0), 0.0)
            .unwrap();
        assert!(!rec.financial.pays_back());

        let now = Utc::now();
        let results = BatchResults {
            entries: vec![AnalysisEntry {
                image_path: "/roofs/north.png".to_string(),
                timestamp: now,
                recommendation: rec,
            }],
            rejections: Vec::new(),
            total_processed: 1,
            successful: 1,
            rejected: 0,
            started_at: now,
            completed_at: now,
        };

        let dir = tempdir().unwrap();
        let path = dir.path().join("never.xlsx");
        export_to_excel(&results, &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
