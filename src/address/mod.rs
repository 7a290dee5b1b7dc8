//! Structured addresses
//!
//! Turns a provider response into a `ParsedAddress`. Parsing is pure: the
//! same response always yields the same address.

use crate::geo::{ComponentKind, ProviderResponse};
use serde::{Deserialize, Serialize};

/// A structured address; fields are empty when the provider omitted them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAddress {
    pub street_number: String,
    pub street_name: String,
    pub suburb: String,
    pub city: String,
    pub region: String,
    pub postcode: String,
    pub country: String,
    /// ISO 3166-1 alpha-2 code, when the provider reports one
    #[serde(default)]
    pub country_code: String,
    pub formatted_address: String,
}

impl ParsedAddress {
    /// True when the address lies in the target country
    ///
    /// The country code decides when both sides have one; country names are
    /// localized by providers, so the name is only a fallback.
    pub fn is_domestic(&self, target_country: &str, target_code: &str) -> bool {
        let code = self.country_code.trim();
        let target_code = target_code.trim();
        if !code.is_empty() && !target_code.is_empty() {
            return code.eq_ignore_ascii_case(target_code);
        }
        !self.country.trim().is_empty() && normalize(&self.country) == normalize(target_country)
    }

    /// "12 Ponsonby Road", or empty when neither part is known
    pub fn street_line(&self) -> String {
        format!("{} {}", self.street_number.trim(), self.street_name.trim())
            .trim()
            .to_string()
    }
}

/// Lower-case, trim, collapse internal whitespace and fold macrons
///
/// Providers are inconsistent about macrons ("Ōtāhuhu" vs "Otahuhu").
pub fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'ā' => 'a',
            'ē' => 'e',
            'ī' => 'i',
            'ō' => 'o',
            'ū' => 'u',
            other => other,
        })
        .collect()
}

/// Parse a provider response into a structured address
pub fn parse(response: &ProviderResponse) -> ParsedAddress {
    let field = |kind| {
        response
            .component(kind)
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };

    let mut address = ParsedAddress {
        street_number: field(ComponentKind::StreetNumber),
        street_name: field(ComponentKind::Route),
        suburb: field(ComponentKind::Suburb),
        city: field(ComponentKind::Locality),
        region: field(ComponentKind::Region),
        postcode: field(ComponentKind::Postcode),
        country: field(ComponentKind::Country),
        country_code: field(ComponentKind::CountryCode),
        formatted_address: response.formatted_address.trim().to_string(),
    };

    // Some providers fold suburb and city into one component
    let folded = address.suburb.is_empty() || normalize(&address.suburb) == normalize(&address.city);
    if folded && !address.city.is_empty() {
        address.suburb = suburb_before_city(&address)
            .unwrap_or_else(|| address.city.clone());
    }

    address
}

/// Take the comma-delimited segment preceding the city in the formatted address
fn suburb_before_city(address: &ParsedAddress) -> Option<String> {
    let segments: Vec<&str> = address.formatted_address.split(',').map(str::trim).collect();
    let city = normalize(&address.city);

    let city_index = segments
        .iter()
        .position(|segment| is_city_segment(&normalize(segment), &city))?;
    let candidate = segments.get(city_index.checked_sub(1)?)?;

    let normalized = normalize(candidate);
    let street_line = normalize(&address.street_line());
    let street_name = normalize(&address.street_name);
    let is_street = !street_name.is_empty() && (normalized == street_name || normalized == street_line);
    let is_number = normalized.chars().all(|c| c.is_ascii_digit() || c.is_whitespace());

    if normalized.is_empty() || is_street || is_number || normalized == city {
        return None;
    }
    Some(candidate.to_string())
}

/// "auckland" or "auckland 1010" (city followed by a postcode)
fn is_city_segment(segment: &str, city: &str) -> bool {
    match segment.strip_prefix(city) {
        Some("") => true,
        Some(rest) => {
            let rest = rest.trim();
            !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}
