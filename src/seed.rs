use std::{collections::HashSet, fs, path::Path};

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use tracing::info;

use crate::{
    auth::password::hash_password,
    model::{
        role::Role,
        staff::{Clinic, StaffMember},
    },
};

/// One entry of the staff seed file. Passwords are hashed on load.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffSeed {
    pub staff_id: String,
    pub name: String,
    pub role: Role,
    pub password: String,
    pub assigned_clinic: Clinic,
}

const BUILTIN_SEED: &str = r#"[
  {
    "staffId": "STAFF001",
    "name": "Sarah Johnson",
    "role": "nurse",
    "password": "password123",
    "assignedClinic": {
      "id": "CLINIC001",
      "name": "Atlantic Family Clinic",
      "latitude": 44.6488,
      "longitude": -63.5752,
      "radius": 75
    }
  },
  {
    "staffId": "STAFF002",
    "name": "Michael Chen",
    "role": "doctor",
    "password": "password123",
    "assignedClinic": {
      "id": "CLINIC002",
      "name": "Harbourview Medical Centre",
      "latitude": 44.6656,
      "longitude": -63.5670,
      "radius": 100
    }
  },
  {
    "staffId": "ADMIN001",
    "name": "Clinic Administrator",
    "role": "admin",
    "password": "admin123",
    "assignedClinic": {
      "id": "CLINIC001",
      "name": "Atlantic Family Clinic",
      "latitude": 44.6488,
      "longitude": -63.5752,
      "radius": 75
    }
  }
]"#;

/// Reads staff from `path`, or the built-in demo set when `None`.
pub fn load_staff(path: Option<&Path>) -> Result<Vec<StaffMember>> {
    let raw = match path {
        Some(p) => fs::read_to_string(p)
            .with_context(|| format!("reading staff seed {}", p.display()))?,
        None => {
            info!("STAFF_SEED_PATH not set, using built-in demo staff");
            BUILTIN_SEED.to_string()
        }
    };

    let seeds: Vec<StaffSeed> = serde_json::from_str(&raw).context("parsing staff seed")?;
    build_staff(seeds)
}

pub fn build_staff(seeds: Vec<StaffSeed>) -> Result<Vec<StaffMember>> {
    let mut seen = HashSet::new();
    let mut staff = Vec::with_capacity(seeds.len());

    for seed in seeds {
        if !seen.insert(seed.staff_id.clone()) {
            bail!("duplicate staffId {} in seed", seed.staff_id);
        }
        if seed.assigned_clinic.radius <= 0.0 {
            bail!("clinic {} must have a positive radius", seed.assigned_clinic.id);
        }

        let password_hash = hash_password(&seed.password)
            .map_err(|e| anyhow!("hashing password for {}: {e}", seed.staff_id))?;

        staff.push(StaffMember {
            staff_id: seed.staff_id,
            password_hash,
            name: seed.name,
            role: seed.role,
            assigned_clinic: seed.assigned_clinic,
        });
    }

    Ok(staff)
}
