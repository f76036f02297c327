//! Form-level validation: composes field rules and reports every problem
//! keyed by a dotted field path (`basic_info.name`, `ethereum_contract_0`).

use crate::error::IntakeError;
use crate::kind::FieldKind;
use crate::sanitize::sanitize;
use crate::suspicious::check_suspicious_address;
use crate::validate::validate;
use registry_types::{BasicInfo, ChainClaim, ChainType, PlatformHandles};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field path to human-readable message. Empty means valid.
pub type FieldErrors = BTreeMap<String, String>;

const NAME_MAX: usize = 200;
const DESCRIPTION_MAX: usize = 2000;
const FOCUS_AREAS_MAX: usize = 10;
const FOCUS_AREA_LEN_MAX: usize = 50;
const TEAM_SIZE_MAX: u64 = 1_000_000;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub name: String,
    pub description: String,
    pub website: String,
    pub founding_date: String,
    pub team_size: u64,
    pub focus_areas: Vec<String>,
    pub handles: HandlesForm,
    pub chains: ChainAddressesForm,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlesForm {
    pub domain: Option<String>,
    pub github_org: Option<String>,
    pub twitter: Option<String>,
    pub discord: Option<String>,
    pub telegram: Option<String>,
}

/// Claimed addresses per chain, in submission order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainAddressesForm {
    pub ethereum_contracts: Vec<String>,
    pub bitcoin_addresses: Vec<String>,
    pub icp_canisters: Vec<String>,
    pub polygon_contracts: Vec<String>,
    pub solana_addresses: Vec<String>,
    pub sui_addresses: Vec<String>,
    pub ton_addresses: Vec<String>,
}

impl ChainAddressesForm {
    fn groups(&self) -> [(ChainType, &'static str, &[String]); 7] {
        [
            (ChainType::Ethereum, "ethereum_contract", self.ethereum_contracts.as_slice()),
            (ChainType::Bitcoin, "bitcoin_address", self.bitcoin_addresses.as_slice()),
            (ChainType::Icp, "icp_canister", self.icp_canisters.as_slice()),
            (ChainType::Polygon, "polygon_contract", self.polygon_contracts.as_slice()),
            (ChainType::Solana, "solana_address", self.solana_addresses.as_slice()),
            (ChainType::Sui, "sui_address", self.sui_addresses.as_slice()),
            (ChainType::Ton, "ton_address", self.ton_addresses.as_slice()),
        ]
    }
}

/// A form that passed validation, already sanitized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CleanRegistration {
    pub basic_info: BasicInfo,
    pub handles: PlatformHandles,
    pub chains: Vec<ChainClaim>,
}

struct Collector {
    errors: FieldErrors,
}

impl Collector {
    fn field(&mut self, path: &str, kind: FieldKind, raw: &str) -> String {
        let cleaned = sanitize(&kind, raw);
        if let Err(e) = validate(&kind, &cleaned) {
            self.errors.insert(path.to_string(), e.to_string());
        }
        cleaned
    }

    fn optional(&mut self, path: &str, kind: FieldKind, raw: &Option<String>) -> Option<String> {
        match raw.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(self.field(path, kind, value)),
        }
    }

    fn reject(&mut self, path: &str, error: IntakeError) {
        self.errors.insert(path.to_string(), error.to_string());
    }
}

pub fn validate_registration(form: &RegistrationForm) -> Result<CleanRegistration, FieldErrors> {
    let mut c = Collector {
        errors: FieldErrors::new(),
    };

    let name = c.field("basic_info.name", FieldKind::Text { max_len: NAME_MAX }, &form.name);
    let description = sanitize(
        &FieldKind::Text {
            max_len: DESCRIPTION_MAX,
        },
        &form.description,
    );
    let website = c.field("basic_info.website", FieldKind::Url, &form.website);
    let founding_date = c.field("basic_info.founding_date", FieldKind::FoundingDate, &form.founding_date);

    if form.team_size == 0 || form.team_size > TEAM_SIZE_MAX {
        c.reject(
            "basic_info.team_size",
            IntakeError::Range {
                min: 1,
                max: TEAM_SIZE_MAX,
                actual: form.team_size,
            },
        );
    }

    if form.focus_areas.len() > FOCUS_AREAS_MAX {
        c.reject(
            "basic_info.focus_areas",
            IntakeError::Format(format!("at most {FOCUS_AREAS_MAX} focus areas")),
        );
    }
    let focus_areas: Vec<String> = form
        .focus_areas
        .iter()
        .take(FOCUS_AREAS_MAX)
        .enumerate()
        .map(|(i, area)| {
            c.field(
                &format!("basic_info.focus_areas_{i}"),
                FieldKind::Text {
                    max_len: FOCUS_AREA_LEN_MAX,
                },
                area,
            )
        })
        .collect();

    let handles = PlatformHandles {
        domain: c.optional("handles.domain", FieldKind::Domain, &form.handles.domain),
        github_org: c.optional("handles.github_org", FieldKind::GitHubOrg, &form.handles.github_org),
        twitter: c.optional("handles.twitter", FieldKind::TwitterHandle, &form.handles.twitter),
        discord: c.optional("handles.discord", FieldKind::DiscordInvite, &form.handles.discord),
        telegram: c.optional("handles.telegram", FieldKind::TelegramChannel, &form.handles.telegram),
    };

    let mut chains = Vec::new();
    for (chain, prefix, addresses) in form.chains.groups() {
        for (i, raw) in addresses.iter().enumerate() {
            let path = format!("{prefix}_{i}");
            let kind = FieldKind::Address(chain);
            let cleaned = sanitize(&kind, raw);
            let checked = check_suspicious_address(chain, &cleaned).and_then(|_| validate(&kind, &cleaned));
            match checked {
                Ok(()) => chains.push(ChainClaim {
                    chain,
                    address: cleaned,
                }),
                Err(e) => c.reject(&path, e),
            }
        }
    }

    if !c.errors.is_empty() {
        return Err(c.errors);
    }
    Ok(CleanRegistration {
        basic_info: BasicInfo {
            name,
            description,
            website,
            founding_date,
            team_size: form.team_size as u32,
            focus_areas,
        },
        handles,
        chains,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> RegistrationForm {
        RegistrationForm {
            name: "Acme DAO".into(),
            description: "Builds <b>things</b>".into(),
            website: "acme.example".into(),
            founding_date: "2021-06-01".into(),
            team_size: 12,
            focus_areas: vec!["DeFi".into()],
            handles: HandlesForm {
                domain: Some("acme.example".into()),
                twitter: Some("acme_dao".into()),
                ..Default::default()
            },
            chains: ChainAddressesForm {
                ethereum_contracts: vec!["0x742d35Cc6634C0532925a3b8D4d3c12de56d0d9E".into()],
                ..Default::default()
            },
        }
    }

    #[test]
    fn valid_form_is_sanitized() {
        let clean = validate_registration(&valid_form()).unwrap();
        assert_eq!(clean.basic_info.website, "https://acme.example");
        assert_eq!(clean.basic_info.description, "Builds bthings/b");
        assert_eq!(clean.handles.twitter.as_deref(), Some("@acme_dao"));
        assert_eq!(clean.chains.len(), 1);
    }

    #[test]
    fn errors_use_positional_paths() {
        let mut form = valid_form();
        form.name = "   ".into();
        form.team_size = 0;
        form.chains.ethereum_contracts.push("0x1234".into());
        form.chains.bitcoin_addresses = vec!["not-an-address".into(), "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa".into()];

        let errors = validate_registration(&form).unwrap_err();
        assert_eq!(errors.get("basic_info.name").map(String::as_str), Some("this field is required"));
        assert!(errors.contains_key("basic_info.team_size"));
        assert!(errors.contains_key("ethereum_contract_1"));
        assert!(!errors.contains_key("ethereum_contract_0"));
        assert!(errors.contains_key("bitcoin_address_0"));
        assert!(!errors.contains_key("bitcoin_address_1"));
    }

    #[test]
    fn burn_address_is_reported_at_its_path() {
        let mut form = valid_form();
        form.chains.ethereum_contracts = vec!["0x0000000000000000000000000000000000000000".into()];
        let errors = validate_registration(&form).unwrap_err();
        assert!(errors["ethereum_contract_0"].starts_with("suspicious input"));
    }

    #[test]
    fn too_many_focus_areas() {
        let mut form = valid_form();
        form.focus_areas = (0..11).map(|i| format!("area{i}")).collect();
        let errors = validate_registration(&form).unwrap_err();
        assert!(errors.contains_key("basic_info.focus_areas"));
    }
}
