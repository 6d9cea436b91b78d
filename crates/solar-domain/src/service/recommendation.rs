//! Suitability decision and advisory messages

use solar_types::{FinancialEstimate, ImageStatistics, Recommendation, SolarEstimate};

use crate::model::SuitabilityPolicy;

/// `true` when panel count, payback and confidence all clear the policy
pub fn is_suitable(
    max_panels: u64,
    payback_years: f64,
    confidence: f64,
    policy: &SuitabilityPolicy,
) -> bool {
    max_panels >= policy.min_panels
        && payback_years <= policy.max_payback_years
        && confidence >= policy.min_confidence
}

/// Ordered advisory messages for a decision
pub fn advisory_messages(
    suitable: bool,
    confidence: f64,
    solar: &SolarEstimate,
    financial: &FinancialEstimate,
    policy: &SuitabilityPolicy,
) -> Vec<String> {
    let mut messages = Vec::new();

    if suitable {
        messages.push(format!(
            "Roof can accommodate {} {} panels ({:.2} kW system)",
            solar.max_panels,
            solar.panel_type.label().to_lowercase(),
            solar.capacity_kw
        ));
        messages.push(format!(
            "Expected return on investment of {:.1}% over 25 years",
            financial.roi_percentage
        ));
        messages.push(format!(
            "Estimated annual production of {:.0} kWh ({:.1} kWh per day)",
            solar.annual_kwh, solar.daily_kwh
        ));
        if financial.payback_years <= policy.fast_payback_years {
            messages.push(format!(
                "Excellent payback period of {:.1} years",
                financial.payback_years
            ));
        }
        return messages;
    }

    if solar.max_panels < policy.min_panels {
        messages.push(format!(
            "Roof area may be too small: room for {} panels, at least {} recommended",
            solar.max_panels, policy.min_panels
        ));
    }
    if financial.payback_years > policy.max_payback_years {
        if financial.pays_back() {
            messages.push(format!(
                "Long payback period of {:.1} years exceeds the {:.0}-year target",
                financial.payback_years, policy.max_payback_years
            ));
        } else {
            messages.push("Projected savings never recover the installation cost".to_string());
        }
    }
    if confidence < policy.min_confidence {
        messages.push(format!(
            "Low analysis confidence ({:.0}%); a clearer top-down image may help",
            confidence * 100.0
        ));
    }
    messages.push("Consult a certified solar installer for an on-site assessment".to_string());

    messages
}

/// Assemble the final recommendation from the scored estimates
pub fn recommend(
    statistics: ImageStatistics,
    solar: SolarEstimate,
    financial: FinancialEstimate,
    confidence: f64,
    location_factor: f64,
    policy: &SuitabilityPolicy,
) -> Recommendation {
    let suitable = is_suitable(
        solar.max_panels,
        financial.payback_years,
        confidence,
        policy,
    );
    let messages = advisory_messages(suitable, confidence, &solar, &financial, policy);

    Recommendation {
        suitable,
        confidence,
        messages,
        statistics,
        solar,
        financial,
        location_factor,
    }
}
