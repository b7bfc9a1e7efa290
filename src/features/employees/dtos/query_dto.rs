use serde::Deserialize;

use crate::core::error::AppError;
use crate::features::employees::models::EmployeeStatus;
use crate::shared::induk_unit::IndukUnit;

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_status(value: Option<String>) -> Result<Option<EmployeeStatus>, AppError> {
    non_blank(value)
        .map(|v| {
            EmployeeStatus::parse(&v).ok_or_else(|| {
                AppError::Validation("status must be either 'aktif' or 'pensiun'".to_string())
            })
        })
        .transpose()
}

fn parse_induk(value: &str) -> Result<IndukUnit, AppError> {
    IndukUnit::from_name(value)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid induk_unit: {}", value)))
}

/// Query params for listing employees
#[derive(Debug, Default, Deserialize)]
pub struct EmployeeListQuery {
    /// Canonical induk unit name
    pub induk: Option<String>,
    /// `aktif` or `pensiun`
    pub status: Option<String>,
    /// Exact `GOL_RUANG`
    pub golongan: Option<String>,
    /// Exact `KET_JABATAN`
    pub jabatan: Option<String>,
    /// Exact `KODE_JABATAN`; takes precedence over `jabatan`
    pub kode_jabatan: Option<String>,
}

/// Parsed employee filter. Blank parameters count as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeFilter {
    pub induk: Option<IndukUnit>,
    pub status: Option<EmployeeStatus>,
    pub golongan: Option<String>,
    pub jabatan: Option<String>,
    pub kode_jabatan: Option<String>,
}

impl EmployeeListQuery {
    pub fn into_filter(self) -> Result<EmployeeFilter, AppError> {
        let induk = non_blank(self.induk)
            .map(|v| parse_induk(&v))
            .transpose()?;
        let kode_jabatan = non_blank(self.kode_jabatan);
        let jabatan = if kode_jabatan.is_some() {
            None
        } else {
            non_blank(self.jabatan)
        };

        Ok(EmployeeFilter {
            induk,
            status: parse_status(self.status)?,
            golongan: non_blank(self.golongan),
            jabatan,
            kode_jabatan,
        })
    }
}

/// Which units the heatmap covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeatmapKind {
    /// The ten regency/city offices
    #[default]
    Kabupaten,
    /// The provincial office only
    Kanwil,
}

impl HeatmapKind {
    pub fn units(self) -> Vec<IndukUnit> {
        IndukUnit::ALL
            .into_iter()
            .filter(|unit| unit.is_kanwil() == (self == HeatmapKind::Kanwil))
            .collect()
    }
}

/// Query params for the heatmap
#[derive(Debug, Default, Deserialize)]
pub struct HeatmapQuery {
    /// `kabupaten` (default) or `kanwil`
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Count retired employees too; only the literal `true` enables it
    pub include_inactive: Option<String>,
}

impl HeatmapQuery {
    pub fn include_inactive(&self) -> bool {
        self.include_inactive.as_deref() == Some("true")
    }

    pub fn kind(&self) -> Result<HeatmapKind, AppError> {
        match self.kind.as_deref().map(str::trim) {
            None | Some("") | Some("kabupaten") => Ok(HeatmapKind::Kabupaten),
            Some("kanwil") => Ok(HeatmapKind::Kanwil),
            Some(other) => Err(AppError::Validation(format!(
                "type must be either 'kabupaten' or 'kanwil', got '{}'",
                other
            ))),
        }
    }
}

/// Query params for employees of one location
#[derive(Debug, Default, Deserialize)]
pub struct ByLocationQuery {
    pub induk_unit: Option<String>,
    /// Display name; derived from the unit when absent
    pub location: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationFilter {
    pub induk: IndukUnit,
    pub location: String,
    pub status: Option<EmployeeStatus>,
}

impl ByLocationQuery {
    pub fn into_filter(self) -> Result<LocationFilter, AppError> {
        let induk = non_blank(self.induk_unit)
            .ok_or_else(|| AppError::Validation("induk_unit is required".to_string()))?;
        let induk = parse_induk(&induk)?;

        if let Some(location) = &self.location {
            if location.chars().count() > 255 {
                return Err(AppError::Validation(
                    "location must be at most 255 characters".to_string(),
                ));
            }
        }

        Ok(LocationFilter {
            induk,
            location: non_blank(self.location).unwrap_or_else(|| induk.location_name().to_string()),
            status: parse_status(self.status)?,
        })
    }
}

/// Columns whose distinct values may be listed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistinctColumn {
    KetJabatan,
    PangkatAsn,
    GolRuang,
    SatuanKerja,
    KabKota,
}

impl DistinctColumn {
    /// Parse the API column name (export naming)
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "KET_JABATAN" => Some(DistinctColumn::KetJabatan),
            "pangkat_asn" => Some(DistinctColumn::PangkatAsn),
            "GOL_RUANG" => Some(DistinctColumn::GolRuang),
            "SATUAN_KERJA" => Some(DistinctColumn::SatuanKerja),
            "kab_kota" => Some(DistinctColumn::KabKota),
            _ => None,
        }
    }

    pub fn sql_column(self) -> &'static str {
        match self {
            DistinctColumn::KetJabatan => "ket_jabatan",
            DistinctColumn::PangkatAsn => "pangkat_asn",
            DistinctColumn::GolRuang => "gol_ruang",
            DistinctColumn::SatuanKerja => "satuan_kerja",
            DistinctColumn::KabKota => "kab_kota",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DistinctQuery {
    pub column: Option<String>,
}

impl DistinctQuery {
    pub fn column(&self) -> Result<DistinctColumn, AppError> {
        let column = self.column.as_deref().unwrap_or_default();
        DistinctColumn::from_param(column).ok_or_else(|| {
            AppError::BadRequest(format!("Column '{}' is not allowed", column))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_filter_blank_values_are_absent() {
        let filter = EmployeeListQuery {
            induk: Some("".to_string()),
            status: Some(" ".to_string()),
            golongan: Some("".to_string()),
            ..Default::default()
        }
        .into_filter()
        .unwrap();

        assert_eq!(filter, EmployeeFilter::default());
    }

    #[test]
    fn test_list_filter_parses_values() {
        let filter = EmployeeListQuery {
            induk: Some("Kantor Kementerian Agama Kabupaten Dompu".to_string()),
            status: Some("pensiun".to_string()),
            golongan: Some("IV/a".to_string()),
            jabatan: Some("Penghulu Ahli Muda".to_string()),
            kode_jabatan: None,
        }
        .into_filter()
        .unwrap();

        assert_eq!(filter.induk, Some(IndukUnit::Dompu));
        assert_eq!(filter.status, Some(EmployeeStatus::Pensiun));
        assert_eq!(filter.golongan.as_deref(), Some("IV/a"));
        assert_eq!(filter.jabatan.as_deref(), Some("Penghulu Ahli Muda"));
    }

    #[test]
    fn test_kode_jabatan_wins_over_jabatan() {
        let filter = EmployeeListQuery {
            jabatan: Some("Guru".to_string()),
            kode_jabatan: Some("J-001".to_string()),
            ..Default::default()
        }
        .into_filter()
        .unwrap();

        assert_eq!(filter.kode_jabatan.as_deref(), Some("J-001"));
        assert_eq!(filter.jabatan, None);
    }

    #[test]
    fn test_list_filter_rejects_unknown_values() {
        let result = EmployeeListQuery {
            induk: Some("Kantor Kementerian Agama Kota Denpasar".to_string()),
            ..Default::default()
        }
        .into_filter();
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let result = EmployeeListQuery {
            status: Some("cuti".to_string()),
            ..Default::default()
        }
        .into_filter();
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_heatmap_kind() {
        assert_eq!(HeatmapQuery::default().kind().unwrap(), HeatmapKind::Kabupaten);

        let query = HeatmapQuery {
            kind: Some("kanwil".to_string()),
            include_inactive: None,
        };
        assert_eq!(query.kind().unwrap(), HeatmapKind::Kanwil);

        let query = HeatmapQuery {
            kind: Some("provinsi".to_string()),
            include_inactive: None,
        };
        assert!(query.kind().is_err());
    }

    #[test]
    fn test_heatmap_include_inactive_only_for_true() {
        assert!(!HeatmapQuery::default().include_inactive());

        for (value, expected) in [("true", true), ("false", false), ("1", false), ("", false)] {
            let query = HeatmapQuery {
                kind: None,
                include_inactive: Some(value.to_string()),
            };
            assert_eq!(query.include_inactive(), expected, "{:?}", value);
        }
    }

    #[test]
    fn test_heatmap_query_accepts_any_include_inactive_value() {
        let uri: axum::http::Uri = "/api/employees/heatmap?type=kanwil&include_inactive=1"
            .parse()
            .unwrap();
        let axum::extract::Query(query) =
            axum::extract::Query::<HeatmapQuery>::try_from_uri(&uri).unwrap();

        assert_eq!(query.kind().unwrap(), HeatmapKind::Kanwil);
        assert!(!query.include_inactive());
    }

    #[test]
    fn test_heatmap_kind_units() {
        assert_eq!(HeatmapKind::Kanwil.units(), vec![IndukUnit::Kanwil]);

        let kabupaten = HeatmapKind::Kabupaten.units();
        assert_eq!(kabupaten.len(), 10);
        assert!(!kabupaten.contains(&IndukUnit::Kanwil));
    }

    #[test]
    fn test_by_location_requires_canonical_unit() {
        let missing = ByLocationQuery::default().into_filter();
        assert!(matches!(missing, Err(AppError::Validation(_))));

        let unknown = ByLocationQuery {
            induk_unit: Some("Kota Mataram".to_string()),
            ..Default::default()
        }
        .into_filter();
        assert!(matches!(unknown, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_by_location_derives_location_name() {
        let filter = ByLocationQuery {
            induk_unit: Some("Kantor Kementerian Agama Kabupaten Sumbawa Barat".to_string()),
            ..Default::default()
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.location, "Kabupaten Sumbawa Barat");

        let filter = ByLocationQuery {
            induk_unit: Some(IndukUnit::Kanwil.name().to_string()),
            location: Some("Kanwil NTB".to_string()),
            status: Some("aktif".to_string()),
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.location, "Kanwil NTB");
        assert_eq!(filter.status, Some(EmployeeStatus::Aktif));
    }

    #[test]
    fn test_distinct_column_whitelist() {
        let query = DistinctQuery {
            column: Some("GOL_RUANG".to_string()),
        };
        assert_eq!(query.column().unwrap().sql_column(), "gol_ruang");

        for column in ["NIP_BARU", "gol_ruang", "password_hash", "1; DROP TABLE employees"] {
            let query = DistinctQuery {
                column: Some(column.to_string()),
            };
            assert!(query.column().is_err(), "{}", column);
        }

        assert!(DistinctQuery::default().column().is_err());
    }
}
