use chrono::{FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::shared::constants::WITA_OFFSET_SECS;
use crate::shared::induk_unit::{classify, IndukUnit};

/// Database model for an employee record, keyed by `nip_baru`
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct Employee {
    pub nip: Option<String>,
    pub nip_baru: String,
    pub nama_lengkap: Option<String>,
    pub kode_pangkat: Option<String>,
    pub gol_ruang: Option<String>,
    pub pangkat_asn: Option<String>,
    pub tmt_pangkat: Option<NaiveDate>,
    pub mk_tahun: Option<i32>,
    pub mk_bulan: Option<i32>,
    pub kode_satuan_kerja: Option<String>,
    pub satuan_kerja: Option<String>,
    pub kode_jabatan: Option<String>,
    pub ket_jabatan: Option<String>,
    pub tmt_jabatan: Option<NaiveDate>,
    pub nama_sekolah: Option<String>,
    pub kode_jenjang_pendidikan: Option<String>,
    pub jenjang_pendidikan: Option<String>,
    pub akta: Option<String>,
    pub fakultas_pendidikan: Option<String>,
    pub jurusan: Option<String>,
    pub tahun_lulus: Option<i32>,
    pub tgl_lahir: Option<NaiveDate>,
    pub tempat_lahir: Option<String>,
    pub isi_unit_kerja: Option<String>,
    pub kab_kota: Option<String>,
    pub tmt_pensiun: Option<NaiveDate>,
    pub tmt_cpns: Option<NaiveDate>,
}

/// Retirement status relative to a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    Aktif,
    Pensiun,
}

impl EmployeeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EmployeeStatus::Aktif => "aktif",
            EmployeeStatus::Pensiun => "pensiun",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "aktif" => Some(EmployeeStatus::Aktif),
            "pensiun" => Some(EmployeeStatus::Pensiun),
            _ => None,
        }
    }
}

impl Employee {
    pub fn induk_unit(&self) -> IndukUnit {
        classify(
            self.satuan_kerja.as_deref(),
            self.kab_kota.as_deref(),
            self.ket_jabatan.as_deref(),
        )
    }

    /// Active until the retirement date; retired on and after it
    pub fn status_on(&self, today: NaiveDate) -> EmployeeStatus {
        match self.tmt_pensiun {
            Some(date) if date <= today => EmployeeStatus::Pensiun,
            _ => EmployeeStatus::Aktif,
        }
    }
}

/// Today's calendar date in WITA (UTC+8)
pub fn today_wita() -> NaiveDate {
    let wita = FixedOffset::east_opt(WITA_OFFSET_SECS).expect("Invalid WITA offset");
    Utc::now().with_timezone(&wita).date_naive()
}
