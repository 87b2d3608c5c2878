use serde::{Deserialize, Serialize};

use vaxbook_core::{DomainError, DomainResult, Entity, VacCenterId};

/// A vaccination center. Read-only through the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacCenter {
    pub id: VacCenterId,
    pub name: String,
    pub tel: String,
}

impl VacCenter {
    pub fn new(name: impl Into<String>, tel: impl Into<String>) -> Self {
        Self {
            id: VacCenterId::new(),
            name: name.into(),
            tel: tel.into(),
        }
    }
}

impl Entity for VacCenter {
    type Id = VacCenterId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A vaccination center as listed in a seed file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewVacCenter {
    pub name: String,
    #[serde(default)]
    pub tel: String,
}

impl NewVacCenter {
    pub fn into_vac_center(self) -> DomainResult<VacCenter> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("please add a vaccination center name"));
        }
        Ok(VacCenter::new(name, self.tel.trim()))
    }
}
