//! Financial estimation: system cost, incentives, savings, payback and ROI

use log::debug;
use solar_types::{FinancialEstimate, SolarEstimate};

use crate::model::KnowledgeBase;

/// Years of savings counted in the lifetime figures
pub const LIFETIME_YEARS: f64 = 25.0;

/// Years until savings cover the net cost; infinite when nothing is saved
pub fn payback_years(net_cost: f64, annual_savings: f64) -> f64 {
    if annual_savings > 0.0 {
        net_cost / annual_savings
    } else {
        f64::INFINITY
    }
}

/// Lifetime return as a percentage of the net cost.
///
/// Zero when there is no cost to return on or no production at all.
pub fn roi_percentage(total_savings: f64, net_cost: f64, annual_savings: f64) -> f64 {
    if net_cost > 0.0 && annual_savings > 0.0 {
        total_savings / net_cost * 100.0
    } else {
        0.0
    }
}

pub fn estimate_financials(solar: &SolarEstimate, kb: &KnowledgeBase) -> FinancialEstimate {
    let panels = solar.max_panels as f64;
    let costs = &kb.installation;

    let panel_cost = panels * kb.sizing.panel_watts * solar.panel_spec.cost_per_watt;
    let labor_cost = panels * costs.labor_per_panel;
    let system_cost = panel_cost + labor_cost + costs.permits + costs.inverter;
    let net_cost = system_cost * (1.0 - kb.incentives.federal_tax_credit);

    let annual_savings = solar.annual_kwh * kb.electricity_rate;
    let payback_years = payback_years(net_cost, annual_savings);
    let total_25yr_savings = annual_savings * LIFETIME_YEARS - net_cost;
    let roi_percentage = roi_percentage(total_25yr_savings, net_cost, annual_savings);

    debug!(
        "financials: system={:.2} net={:.2} savings/yr={:.2} payback={:.2}y roi={:.1}%",
        system_cost, net_cost, annual_savings, payback_years, roi_percentage
    );

    FinancialEstimate {
        system_cost,
        net_cost,
        annual_savings,
        payback_years,
        total_25yr_savings,
        roi_percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solar_types::PanelType;

    fn solar(max_panels: u64, annual_kwh: f64) -> SolarEstimate {
        let kb = KnowledgeBase::default();
        SolarEstimate {
            roof_area_sqft: 1200,
            max_panels,
            panel_type: PanelType::Monocrystalline,
            panel_spec: kb.panels.monocrystalline,
            capacity_kw: 0.0,
            annual_kwh,
            daily_kwh: 0.0,
        }
    }

    #[test]
    fn test_cost_breakdown() {
        let kb = KnowledgeBase::default();
        let estimate = estimate_financials(&solar(10, 10_000.0), &kb);

        // panels: 10 * 300 * 0.35 = 1050; labor: 1500; permits 500; inverter 1000
        assert!((estimate.system_cost - 4050.0).abs() < 1e-9);
        assert!((estimate.net_cost - 2835.0).abs() < 1e-9);
        assert!((estimate.annual_savings - 1200.0).abs() < 1e-9);
        assert!((estimate.payback_years - 2.3625).abs() < 1e-9);
        assert!((estimate.total_25yr_savings - 27_165.0).abs() < 1e-9);
        assert!((estimate.roi_percentage - 27_165.0 / 2835.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_production_never_pays_back() {
        let kb = KnowledgeBase::default();
        let estimate = estimate_financials(&solar(0, 0.0), &kb);

        assert!(estimate.payback_years.is_infinite());
        assert_eq!(estimate.roi_percentage, 0.0);
        assert!((estimate.system_cost - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_net_cost_gives_zero_roi() {
        let mut kb = KnowledgeBase::default();
        kb.incentives.federal_tax_credit = 1.0;
        let estimate = estimate_financials(&solar(10, 10_000.0), &kb);

        assert_eq!(estimate.net_cost, 0.0);
        assert_eq!(estimate.roi_percentage, 0.0);
        assert_eq!(estimate.payback_years, 0.0);
    }

    #[test]
    fn test_substituted_pricing_table() {
        let mut kb = KnowledgeBase::default();
        kb.electricity_rate = 0.24;
        let cheap = estimate_financials(&solar(10, 10_000.0), &KnowledgeBase::default());
        let pricey = estimate_financials(&solar(10, 10_000.0), &kb);

        assert!((pricey.annual_savings - 2.0 * cheap.annual_savings).abs() < 1e-9);
        assert!(pricey.payback_years < cheap.payback_years);
    }

    #[test]
    fn test_payback_helper() {
        assert_eq!(payback_years(1000.0, 250.0), 4.0);
        assert!(payback_years(1000.0, 0.0).is_infinite());
        assert_eq!(roi_percentage(-500.0, 1000.0, 0.0), 0.0);
    }
}
