use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::employees::models::{Employee, EmployeeStatus};
use crate::shared::induk_unit::IndukUnit;
use crate::shared::validation::NIP_REGEX;

/// Employee as returned by the API, with derived `induk_unit` and `status`.
///
/// Keys keep the column names of the BKN export (`NIP_BARU`,
/// `NAMA_LENGKAP`, `kab_kota`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployeeResponseDto {
    #[serde(rename = "NIP")]
    pub nip: Option<String>,
    #[serde(rename = "NIP_BARU")]
    pub nip_baru: String,
    #[serde(rename = "NAMA_LENGKAP")]
    pub nama_lengkap: Option<String>,
    #[serde(rename = "KODE_PANGKAT")]
    pub kode_pangkat: Option<String>,
    #[serde(rename = "GOL_RUANG")]
    pub gol_ruang: Option<String>,
    pub pangkat_asn: Option<String>,
    #[serde(rename = "TMT_PANGKAT")]
    pub tmt_pangkat: Option<NaiveDate>,
    #[serde(rename = "MK_TAHUN")]
    pub mk_tahun: Option<i32>,
    #[serde(rename = "MK_BULAN")]
    pub mk_bulan: Option<i32>,
    #[serde(rename = "KODE_SATUAN_KERJA")]
    pub kode_satuan_kerja: Option<String>,
    #[serde(rename = "SATUAN_KERJA")]
    pub satuan_kerja: Option<String>,
    #[serde(rename = "KODE_JABATAN")]
    pub kode_jabatan: Option<String>,
    #[serde(rename = "KET_JABATAN")]
    pub ket_jabatan: Option<String>,
    #[serde(rename = "TMT_JABATAN")]
    pub tmt_jabatan: Option<NaiveDate>,
    #[serde(rename = "NAMA_SEKOLAH")]
    pub nama_sekolah: Option<String>,
    #[serde(rename = "KODE_JENJANG_PENDIDIKAN")]
    pub kode_jenjang_pendidikan: Option<String>,
    #[serde(rename = "JENJANG_PENDIDIKAN")]
    pub jenjang_pendidikan: Option<String>,
    #[serde(rename = "AKTA")]
    pub akta: Option<String>,
    #[serde(rename = "FAKULTAS_PENDIDIKAN")]
    pub fakultas_pendidikan: Option<String>,
    #[serde(rename = "JURUSAN")]
    pub jurusan: Option<String>,
    #[serde(rename = "TAHUN_LULUS")]
    pub tahun_lulus: Option<i32>,
    #[serde(rename = "TGL_LAHIR")]
    pub tgl_lahir: Option<NaiveDate>,
    #[serde(rename = "TEMPAT_LAHIR")]
    pub tempat_lahir: Option<String>,
    #[serde(rename = "ISI_UNIT_KERJA")]
    pub isi_unit_kerja: Option<String>,
    pub kab_kota: Option<String>,
    #[serde(rename = "TMT_PENSIUN")]
    pub tmt_pensiun: Option<NaiveDate>,
    pub tmt_cpns: Option<NaiveDate>,
    pub induk_unit: IndukUnit,
    pub status: EmployeeStatus,
}

impl EmployeeResponseDto {
    pub fn new(e: Employee, today: NaiveDate) -> Self {
        let induk_unit = e.induk_unit();
        let status = e.status_on(today);

        Self {
            nip: e.nip,
            nip_baru: e.nip_baru,
            nama_lengkap: e.nama_lengkap,
            kode_pangkat: e.kode_pangkat,
            gol_ruang: e.gol_ruang,
            pangkat_asn: e.pangkat_asn,
            tmt_pangkat: e.tmt_pangkat,
            mk_tahun: e.mk_tahun,
            mk_bulan: e.mk_bulan,
            kode_satuan_kerja: e.kode_satuan_kerja,
            satuan_kerja: e.satuan_kerja,
            kode_jabatan: e.kode_jabatan,
            ket_jabatan: e.ket_jabatan,
            tmt_jabatan: e.tmt_jabatan,
            nama_sekolah: e.nama_sekolah,
            kode_jenjang_pendidikan: e.kode_jenjang_pendidikan,
            jenjang_pendidikan: e.jenjang_pendidikan,
            akta: e.akta,
            fakultas_pendidikan: e.fakultas_pendidikan,
            jurusan: e.jurusan,
            tahun_lulus: e.tahun_lulus,
            tgl_lahir: e.tgl_lahir,
            tempat_lahir: e.tempat_lahir,
            isi_unit_kerja: e.isi_unit_kerja,
            kab_kota: e.kab_kota,
            tmt_pensiun: e.tmt_pensiun,
            tmt_cpns: e.tmt_cpns,
            induk_unit,
            status,
        }
    }
}

/// Request DTO for creating an employee
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEmployeeDto {
    #[serde(rename = "NIP")]
    #[validate(length(max = 50))]
    pub nip: Option<String>,

    #[serde(rename = "NIP_BARU")]
    #[validate(
        length(min = 1, max = 50, message = "NIP_BARU must be 1-50 characters"),
        regex(path = *NIP_REGEX, message = "NIP_BARU must contain digits only")
    )]
    pub nip_baru: String,

    #[serde(rename = "NAMA_LENGKAP")]
    #[validate(length(max = 255))]
    pub nama_lengkap: Option<String>,

    #[serde(rename = "KODE_PANGKAT")]
    #[validate(length(max = 20))]
    pub kode_pangkat: Option<String>,

    #[serde(rename = "GOL_RUANG")]
    #[validate(length(max = 20))]
    pub gol_ruang: Option<String>,

    #[validate(length(max = 100))]
    pub pangkat_asn: Option<String>,

    #[serde(rename = "TMT_PANGKAT")]
    pub tmt_pangkat: Option<NaiveDate>,

    #[serde(rename = "MK_TAHUN")]
    pub mk_tahun: Option<i32>,

    #[serde(rename = "MK_BULAN")]
    pub mk_bulan: Option<i32>,

    #[serde(rename = "KODE_SATUAN_KERJA")]
    #[validate(length(max = 50))]
    pub kode_satuan_kerja: Option<String>,

    #[serde(rename = "SATUAN_KERJA")]
    #[validate(length(max = 255))]
    pub satuan_kerja: Option<String>,

    #[serde(rename = "KODE_JABATAN")]
    #[validate(length(max = 50))]
    pub kode_jabatan: Option<String>,

    #[serde(rename = "KET_JABATAN")]
    #[validate(length(max = 255))]
    pub ket_jabatan: Option<String>,

    #[serde(rename = "TMT_JABATAN")]
    pub tmt_jabatan: Option<NaiveDate>,

    #[serde(rename = "NAMA_SEKOLAH")]
    #[validate(length(max = 255))]
    pub nama_sekolah: Option<String>,

    #[serde(rename = "KODE_JENJANG_PENDIDIKAN")]
    #[validate(length(max = 50))]
    pub kode_jenjang_pendidikan: Option<String>,

    #[serde(rename = "JENJANG_PENDIDIKAN")]
    #[validate(length(max = 100))]
    pub jenjang_pendidikan: Option<String>,

    #[serde(rename = "AKTA")]
    #[validate(length(max = 100))]
    pub akta: Option<String>,

    #[serde(rename = "FAKULTAS_PENDIDIKAN")]
    #[validate(length(max = 255))]
    pub fakultas_pendidikan: Option<String>,

    #[serde(rename = "JURUSAN")]
    #[validate(length(max = 255))]
    pub jurusan: Option<String>,

    #[serde(rename = "TAHUN_LULUS")]
    pub tahun_lulus: Option<i32>,

    #[serde(rename = "TGL_LAHIR")]
    pub tgl_lahir: Option<NaiveDate>,

    #[serde(rename = "TEMPAT_LAHIR")]
    #[validate(length(max = 255))]
    pub tempat_lahir: Option<String>,

    #[serde(rename = "ISI_UNIT_KERJA")]
    pub isi_unit_kerja: Option<String>,

    #[validate(length(max = 100))]
    pub kab_kota: Option<String>,

    #[serde(rename = "TMT_PENSIUN")]
    pub tmt_pensiun: Option<NaiveDate>,

    pub tmt_cpns: Option<NaiveDate>,
}

impl From<CreateEmployeeDto> for Employee {
    fn from(dto: CreateEmployeeDto) -> Self {
        Self {
            nip: dto.nip,
            nip_baru: dto.nip_baru,
            nama_lengkap: dto.nama_lengkap,
            kode_pangkat: dto.kode_pangkat,
            gol_ruang: dto.gol_ruang,
            pangkat_asn: dto.pangkat_asn,
            tmt_pangkat: dto.tmt_pangkat,
            mk_tahun: dto.mk_tahun,
            mk_bulan: dto.mk_bulan,
            kode_satuan_kerja: dto.kode_satuan_kerja,
            satuan_kerja: dto.satuan_kerja,
            kode_jabatan: dto.kode_jabatan,
            ket_jabatan: dto.ket_jabatan,
            tmt_jabatan: dto.tmt_jabatan,
            nama_sekolah: dto.nama_sekolah,
            kode_jenjang_pendidikan: dto.kode_jenjang_pendidikan,
            jenjang_pendidikan: dto.jenjang_pendidikan,
            akta: dto.akta,
            fakultas_pendidikan: dto.fakultas_pendidikan,
            jurusan: dto.jurusan,
            tahun_lulus: dto.tahun_lulus,
            tgl_lahir: dto.tgl_lahir,
            tempat_lahir: dto.tempat_lahir,
            isi_unit_kerja: dto.isi_unit_kerja,
            kab_kota: dto.kab_kota,
            tmt_pensiun: dto.tmt_pensiun,
            tmt_cpns: dto.tmt_cpns,
        }
    }
}

/// Present-but-null becomes `Some(None)`; absent stays `None` via `default`
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Request DTO for a partial employee update.
///
/// Absent keys leave the column unchanged, `null` clears it. `NIP_BARU`
/// cannot be cleared. Unknown keys such as `induk_unit` are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateEmployeeDto {
    #[serde(rename = "NIP", default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 50))]
    pub nip: Option<Option<String>>,

    #[serde(rename = "NIP_BARU", default)]
    #[validate(
        length(min = 1, max = 50, message = "NIP_BARU must be 1-50 characters"),
        regex(path = *NIP_REGEX, message = "NIP_BARU must contain digits only")
    )]
    pub nip_baru: Option<String>,

    #[serde(rename = "NAMA_LENGKAP", default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 255))]
    pub nama_lengkap: Option<Option<String>>,

    #[serde(rename = "KODE_PANGKAT", default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 20))]
    pub kode_pangkat: Option<Option<String>>,

    #[serde(rename = "GOL_RUANG", default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 20))]
    pub gol_ruang: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 100))]
    pub pangkat_asn: Option<Option<String>>,

    #[serde(rename = "TMT_PANGKAT", default, deserialize_with = "deserialize_some")]
    pub tmt_pangkat: Option<Option<NaiveDate>>,

    #[serde(rename = "MK_TAHUN", default, deserialize_with = "deserialize_some")]
    pub mk_tahun: Option<Option<i32>>,

    #[serde(rename = "MK_BULAN", default, deserialize_with = "deserialize_some")]
    pub mk_bulan: Option<Option<i32>>,

    #[serde(rename = "KODE_SATUAN_KERJA", default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 50))]
    pub kode_satuan_kerja: Option<Option<String>>,

    #[serde(rename = "SATUAN_KERJA", default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 255))]
    pub satuan_kerja: Option<Option<String>>,

    #[serde(rename = "KODE_JABATAN", default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 50))]
    pub kode_jabatan: Option<Option<String>>,

    #[serde(rename = "KET_JABATAN", default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 255))]
    pub ket_jabatan: Option<Option<String>>,

    #[serde(rename = "TMT_JABATAN", default, deserialize_with = "deserialize_some")]
    pub tmt_jabatan: Option<Option<NaiveDate>>,

    #[serde(rename = "NAMA_SEKOLAH", default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 255))]
    pub nama_sekolah: Option<Option<String>>,

    #[serde(
        rename = "KODE_JENJANG_PENDIDIKAN",
        default,
        deserialize_with = "deserialize_some"
    )]
    #[validate(length(max = 50))]
    pub kode_jenjang_pendidikan: Option<Option<String>>,

    #[serde(rename = "JENJANG_PENDIDIKAN", default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 100))]
    pub jenjang_pendidikan: Option<Option<String>>,

    #[serde(rename = "AKTA", default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 100))]
    pub akta: Option<Option<String>>,

    #[serde(rename = "FAKULTAS_PENDIDIKAN", default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 255))]
    pub fakultas_pendidikan: Option<Option<String>>,

    #[serde(rename = "JURUSAN", default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 255))]
    pub jurusan: Option<Option<String>>,

    #[serde(rename = "TAHUN_LULUS", default, deserialize_with = "deserialize_some")]
    pub tahun_lulus: Option<Option<i32>>,

    #[serde(rename = "TGL_LAHIR", default, deserialize_with = "deserialize_some")]
    pub tgl_lahir: Option<Option<NaiveDate>>,

    #[serde(rename = "TEMPAT_LAHIR", default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 255))]
    pub tempat_lahir: Option<Option<String>>,

    #[serde(rename = "ISI_UNIT_KERJA", default, deserialize_with = "deserialize_some")]
    pub isi_unit_kerja: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 100))]
    pub kab_kota: Option<Option<String>>,

    #[serde(rename = "TMT_PENSIUN", default, deserialize_with = "deserialize_some")]
    pub tmt_pensiun: Option<Option<NaiveDate>>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub tmt_cpns: Option<Option<NaiveDate>>,
}

impl UpdateEmployeeDto {
    /// Apply the present fields to `employee`.
    ///
    /// `NIP_BARU` is only applied when `can_change_nip` is set; otherwise it
    /// is dropped without error.
    pub fn apply(self, employee: &mut Employee, can_change_nip: bool) {
        if let Some(nip_baru) = self.nip_baru.clone() {
            if can_change_nip {
                employee.nip_baru = nip_baru;
            }
        }

        macro_rules! patch {
            ($dto:ident => $target:ident: $($field:ident),* $(,)?) => {
                $(
                    if let Some(value) = $dto.$field {
                        $target.$field = value;
                    }
                )*
            };
        }

        let dto = self;
        patch!(dto => employee:
            nip,
            nama_lengkap,
            kode_pangkat,
            gol_ruang,
            pangkat_asn,
            tmt_pangkat,
            mk_tahun,
            mk_bulan,
            kode_satuan_kerja,
            satuan_kerja,
            kode_jabatan,
            ket_jabatan,
            tmt_jabatan,
            nama_sekolah,
            kode_jenjang_pendidikan,
            jenjang_pendidikan,
            akta,
            fakultas_pendidikan,
            jurusan,
            tahun_lulus,
            tgl_lahir,
            tempat_lahir,
            isi_unit_kerja,
            kab_kota,
            tmt_pensiun,
            tmt_cpns,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn employee() -> Employee {
        Employee {
            nip: Some("150123456".to_string()),
            nip_baru: "198503302009011009".to_string(),
            nama_lengkap: Some("Baiq Nurul Aini".to_string()),
            gol_ruang: Some("III/c".to_string()),
            satuan_kerja: Some("MAN 1 Lombok Tengah".to_string()),
            ket_jabatan: Some("Guru Ahli Muda".to_string()),
            tmt_pensiun: NaiveDate::from_ymd_opt(2045, 4, 1),
            ..Default::default()
        }
    }

    #[test]
    fn test_response_uses_export_keys_and_derived_fields() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let json = serde_json::to_value(EmployeeResponseDto::new(employee(), today)).unwrap();

        assert_eq!(json["NIP_BARU"], "198503302009011009");
        assert_eq!(json["NAMA_LENGKAP"], "Baiq Nurul Aini");
        assert_eq!(json["GOL_RUANG"], "III/c");
        assert_eq!(json["TMT_PENSIUN"], "2045-04-01");
        assert_eq!(json["kab_kota"], serde_json::Value::Null);
        assert_eq!(
            json["induk_unit"],
            "Kantor Kementerian Agama Kabupaten Lombok Tengah"
        );
        assert_eq!(json["status"], "aktif");
        assert!(json.get("nip_baru").is_none());
    }

    #[test]
    fn test_create_dto_validation() {
        let dto: CreateEmployeeDto = serde_json::from_value(json!({
            "NIP_BARU": "198503302009011009",
            "NAMA_LENGKAP": "Lalu Muhammad Zaini",
            "TMT_PENSIUN": "2043-09-01",
            "MK_TAHUN": 12
        }))
        .unwrap();
        assert!(dto.validate().is_ok());

        let employee = Employee::from(dto);
        assert_eq!(employee.mk_tahun, Some(12));
        assert_eq!(employee.tmt_pensiun, NaiveDate::from_ymd_opt(2043, 9, 1));
    }

    #[test]
    fn test_create_dto_rejects_bad_nip_and_lengths() {
        let dto: CreateEmployeeDto =
            serde_json::from_value(json!({ "NIP_BARU": "1985-0330" })).unwrap();
        assert!(dto.validate().is_err());

        let dto: CreateEmployeeDto = serde_json::from_value(json!({
            "NIP_BARU": "1".repeat(51)
        }))
        .unwrap();
        assert!(dto.validate().is_err());

        let dto: CreateEmployeeDto = serde_json::from_value(json!({
            "NIP_BARU": "123",
            "GOL_RUANG": "x".repeat(21)
        }))
        .unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_dto_requires_nip_baru() {
        let result: Result<CreateEmployeeDto, _> =
            serde_json::from_value(json!({ "NAMA_LENGKAP": "Tanpa NIP" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_distinguishes_absent_and_null() {
        let dto: UpdateEmployeeDto = serde_json::from_value(json!({
            "NAMA_LENGKAP": "Baiq Nurul Aini, S.Pd.",
            "GOL_RUANG": null
        }))
        .unwrap();

        assert_eq!(
            dto.nama_lengkap,
            Some(Some("Baiq Nurul Aini, S.Pd.".to_string()))
        );
        assert_eq!(dto.gol_ruang, Some(None));
        assert_eq!(dto.nip, None);

        let mut e = employee();
        dto.apply(&mut e, true);

        assert_eq!(e.nama_lengkap.as_deref(), Some("Baiq Nurul Aini, S.Pd."));
        assert_eq!(e.gol_ruang, None);
        assert_eq!(e.nip.as_deref(), Some("150123456"));
        assert_eq!(e.satuan_kerja.as_deref(), Some("MAN 1 Lombok Tengah"));
    }

    #[test]
    fn test_update_nip_baru_requires_permission() {
        let dto: UpdateEmployeeDto = serde_json::from_value(json!({
            "NIP_BARU": "199001012015031001",
            "KET_JABATAN": "Guru Ahli Madya"
        }))
        .unwrap();

        let mut as_operator = employee();
        dto.clone().apply(&mut as_operator, false);
        assert_eq!(as_operator.nip_baru, "198503302009011009");
        assert_eq!(as_operator.ket_jabatan.as_deref(), Some("Guru Ahli Madya"));

        let mut as_admin = employee();
        dto.apply(&mut as_admin, true);
        assert_eq!(as_admin.nip_baru, "199001012015031001");
    }

    #[test]
    fn test_update_ignores_induk_unit() {
        let dto: UpdateEmployeeDto = serde_json::from_value(json!({
            "induk_unit": "Kantor Kementerian Agama Kota Mataram"
        }))
        .unwrap();

        let mut e = employee();
        dto.apply(&mut e, true);
        assert_eq!(e, employee());
    }

    #[test]
    fn test_update_validation() {
        let dto: UpdateEmployeeDto = serde_json::from_value(json!({
            "NIP_BARU": "abc"
        }))
        .unwrap();
        assert!(dto.validate().is_err());

        let dto: UpdateEmployeeDto = serde_json::from_value(json!({
            "kab_kota": "x".repeat(101)
        }))
        .unwrap();
        assert!(dto.validate().is_err());

        let dto: UpdateEmployeeDto = serde_json::from_value(json!({
            "kab_kota": null
        }))
        .unwrap();
        assert!(dto.validate().is_ok());
    }
}
