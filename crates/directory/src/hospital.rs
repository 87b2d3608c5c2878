use serde::{Deserialize, Serialize};

use vaxbook_auth::{Owned, PrincipalId};
use vaxbook_core::{DomainError, DomainResult, Entity, HospitalId};

pub const MAX_NAME_LEN: usize = 50;
pub const MAX_POSTAL_CODE_LEN: usize = 5;

/// A hospital listed in the directory.
///
/// Hospitals carry no owner: who may change them is decided by role alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: HospitalId,
    pub name: String,
    pub address: String,
    pub district: String,
    pub province: String,
    pub postalcode: String,
    pub tel: String,
    pub region: String,
}

impl Entity for Hospital {
    type Id = HospitalId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Owned for Hospital {
    fn owner(&self) -> Option<PrincipalId> {
        None
    }
}

/// Creation input for a hospital.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewHospital {
    pub name: String,
    pub address: String,
    pub district: String,
    pub province: String,
    pub postalcode: String,
    #[serde(default)]
    pub tel: String,
    pub region: String,
}

impl NewHospital {
    pub fn into_hospital(self, id: HospitalId) -> DomainResult<Hospital> {
        let hospital = Hospital {
            id,
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
            district: self.district.trim().to_string(),
            province: self.province.trim().to_string(),
            postalcode: self.postalcode.trim().to_string(),
            tel: self.tel.trim().to_string(),
            region: self.region.trim().to_string(),
        };
        validate(&hospital)?;
        Ok(hospital)
    }
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HospitalPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub postalcode: Option<String>,
    pub tel: Option<String>,
    pub region: Option<String>,
}

impl HospitalPatch {
    /// Apply onto a copy of `current`; the original is untouched on error.
    pub fn apply(self, current: &Hospital) -> DomainResult<Hospital> {
        let pick = |new: Option<String>, old: &String| new.map(|v| v.trim().to_string()).unwrap_or_else(|| old.clone());
        let updated = Hospital {
            id: current.id,
            name: pick(self.name, &current.name),
            address: pick(self.address, &current.address),
            district: pick(self.district, &current.district),
            province: pick(self.province, &current.province),
            postalcode: pick(self.postalcode, &current.postalcode),
            tel: pick(self.tel, &current.tel),
            region: pick(self.region, &current.region),
        };
        validate(&updated)?;
        Ok(updated)
    }
}

fn validate(h: &Hospital) -> DomainResult<()> {
    let required = [
        ("name", &h.name),
        ("address", &h.address),
        ("district", &h.district),
        ("province", &h.province),
        ("postalcode", &h.postalcode),
        ("region", &h.region),
    ];
    if let Some((field, _)) = required.iter().find(|(_, v)| v.is_empty()) {
        return Err(DomainError::validation(format!("please add a {field}")));
    }
    if h.name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(format!(
            "name can not be more than {MAX_NAME_LEN} characters"
        )));
    }
    if h.postalcode.chars().count() > MAX_POSTAL_CODE_LEN {
        return Err(DomainError::validation(format!(
            "postal code can not be more than {MAX_POSTAL_CODE_LEN} digits"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> NewHospital {
        NewHospital {
            name: " Siriraj ".to_string(),
            address: "2 Wanglang Rd".to_string(),
            district: "Bangkok Noi".to_string(),
            province: "Bangkok".to_string(),
            postalcode: "10700".to_string(),
            tel: "02-419-7000".to_string(),
            region: "Central".to_string(),
        }
    }

    #[test]
    fn creation_trims_and_validates() {
        let h = input().into_hospital(HospitalId::new()).unwrap();
        assert_eq!(h.name, "Siriraj");
        assert_eq!(h.owner(), None);
    }

    #[test]
    fn missing_required_field_names_it() {
        let mut bad = input();
        bad.region = "  ".to_string();
        let err = bad.into_hospital(HospitalId::new()).unwrap_err();
        assert_eq!(err, DomainError::validation("please add a region"));
    }

    #[test]
    fn limits_are_enforced() {
        let mut long_name = input();
        long_name.name = "x".repeat(MAX_NAME_LEN + 1);
        assert!(long_name.into_hospital(HospitalId::new()).is_err());

        let mut long_postal = input();
        long_postal.postalcode = "123456".to_string();
        assert!(long_postal.into_hospital(HospitalId::new()).is_err());
    }

    #[test]
    fn patch_changes_only_given_fields() {
        let h = input().into_hospital(HospitalId::new()).unwrap();
        let patch = HospitalPatch {
            tel: Some("02-000-0000".to_string()),
            ..Default::default()
        };
        let updated = patch.apply(&h).unwrap();
        assert_eq!(updated.tel, "02-000-0000");
        assert_eq!(updated.name, h.name);
        assert_eq!(updated.id, h.id);
    }

    #[test]
    fn patch_cannot_blank_a_required_field() {
        let h = input().into_hospital(HospitalId::new()).unwrap();
        let patch = HospitalPatch {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(patch.apply(&h).is_err());
    }
}
