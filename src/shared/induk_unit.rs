//! Induk unit (parent organizational unit) inference.
//!
//! Employee records only carry free-text workplace fields (`SATUAN_KERJA`,
//! `kab_kota`, `KET_JABATAN`). The parent office an employee belongs to is
//! derived from those texts at read time and is never stored.
//!
//! Classification runs an ordered rule table; the first rule that yields a
//! unit wins and the provincial office (Kanwil) is the fallback, so every
//! input maps to exactly one of the eleven canonical units.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const KANWIL_NAME: &str = "Kantor Wilayah Kementerian Agama Provinsi Nusa Tenggara Barat";
const KANWIL_PREFIX: &str = "Kantor Wilayah Kementerian Agama Provinsi ";
const KANKEMENAG_PREFIX: &str = "Kantor Kementerian Agama ";

/// Canonical parent units of the NTB regional office
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum IndukUnit {
    #[serde(rename = "Kantor Wilayah Kementerian Agama Provinsi Nusa Tenggara Barat")]
    Kanwil,
    #[serde(rename = "Kantor Kementerian Agama Kota Mataram")]
    KotaMataram,
    #[serde(rename = "Kantor Kementerian Agama Kota Bima")]
    KotaBima,
    #[serde(rename = "Kantor Kementerian Agama Kabupaten Lombok Barat")]
    LombokBarat,
    #[serde(rename = "Kantor Kementerian Agama Kabupaten Lombok Tengah")]
    LombokTengah,
    #[serde(rename = "Kantor Kementerian Agama Kabupaten Lombok Timur")]
    LombokTimur,
    #[serde(rename = "Kantor Kementerian Agama Kabupaten Lombok Utara")]
    LombokUtara,
    #[serde(rename = "Kantor Kementerian Agama Kabupaten Sumbawa")]
    Sumbawa,
    #[serde(rename = "Kantor Kementerian Agama Kabupaten Sumbawa Barat")]
    SumbawaBarat,
    #[serde(rename = "Kantor Kementerian Agama Kabupaten Dompu")]
    Dompu,
    #[serde(rename = "Kantor Kementerian Agama Kabupaten Bima")]
    KabupatenBima,
}

impl IndukUnit {
    /// All canonical units, provincial office first
    pub const ALL: [IndukUnit; 11] = [
        IndukUnit::Kanwil,
        IndukUnit::KotaMataram,
        IndukUnit::KotaBima,
        IndukUnit::LombokBarat,
        IndukUnit::LombokTengah,
        IndukUnit::LombokTimur,
        IndukUnit::LombokUtara,
        IndukUnit::Sumbawa,
        IndukUnit::SumbawaBarat,
        IndukUnit::Dompu,
        IndukUnit::KabupatenBima,
    ];

    /// Canonical office name
    pub fn name(self) -> &'static str {
        match self {
            IndukUnit::Kanwil => KANWIL_NAME,
            IndukUnit::KotaMataram => "Kantor Kementerian Agama Kota Mataram",
            IndukUnit::KotaBima => "Kantor Kementerian Agama Kota Bima",
            IndukUnit::LombokBarat => "Kantor Kementerian Agama Kabupaten Lombok Barat",
            IndukUnit::LombokTengah => "Kantor Kementerian Agama Kabupaten Lombok Tengah",
            IndukUnit::LombokTimur => "Kantor Kementerian Agama Kabupaten Lombok Timur",
            IndukUnit::LombokUtara => "Kantor Kementerian Agama Kabupaten Lombok Utara",
            IndukUnit::Sumbawa => "Kantor Kementerian Agama Kabupaten Sumbawa",
            IndukUnit::SumbawaBarat => "Kantor Kementerian Agama Kabupaten Sumbawa Barat",
            IndukUnit::Dompu => "Kantor Kementerian Agama Kabupaten Dompu",
            IndukUnit::KabupatenBima => "Kantor Kementerian Agama Kabupaten Bima",
        }
    }

    /// Parse an exact canonical name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|unit| unit.name() == name)
    }

    pub fn is_kanwil(self) -> bool {
        self == IndukUnit::Kanwil
    }

    /// Short location label used on the map, e.g. "Kota Mataram" or
    /// "Nusa Tenggara Barat" for the provincial office.
    pub fn location_name(self) -> &'static str {
        let name = self.name();
        name.strip_prefix(KANWIL_PREFIX)
            .or_else(|| name.strip_prefix(KANKEMENAG_PREFIX))
            .unwrap_or(name)
    }
}

impl std::fmt::Display for IndukUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

lazy_static! {
    static ref SUB_BAGIAN: Regex = Regex::new(r"\bsub\s+bagian\b|\bsubbag\b").unwrap();
    static ref TATA_USAHA: Regex = Regex::new(r"\btata\s+usaha\b").unwrap();
    static ref BAGIAN_TATA_USAHA: Regex = Regex::new(r"\bbagian\s+tata\s+usaha\b").unwrap();
    static ref SUB_BAGIAN_TATA_USAHA: Regex =
        Regex::new(r"\bsub\s+bagian\s+tata\s+usaha\b").unwrap();

    /// Position-text extractors, tried in order
    static ref POSITION_KOTA: Regex =
        Regex::new(r"\bkota\s+([a-z\s]+?)(?:\s+provinsi|\s+kantor|$)").unwrap();
    static ref POSITION_KAB: Regex =
        Regex::new(r"\bkab(?:upaten)?\s+([a-z\s]+?)(?:\s+provinsi|\s+kantor|$)").unwrap();
    static ref POSITION_KANTOR_KOTA: Regex =
        Regex::new(r"kantor\s+kementerian\s+agama\s+kota\s+([a-z\s]+?)(?:\s+provinsi|$)").unwrap();
    static ref POSITION_KANTOR_KAB: Regex = Regex::new(
        r"kantor\s+kementerian\s+agama\s+kab(?:upaten)?\s+([a-z\s]+?)(?:\s+provinsi|$)"
    )
    .unwrap();
    static ref TRAILING_PROVINSI: Regex = Regex::new(r"\s+provinsi.*$").unwrap();

    static ref KANWIL_INDICATOR: Regex = Regex::new(
        r"\bkanwil\b|\bkantor\s+wilayah\b|\bprovinsi\s+nusa\s+tenggara\s+barat\b"
    )
    .unwrap();
    static ref BIMAS_BUREAU: Regex = Regex::new(
        r"\b(?:bimas|pembimbing\s+masyarakat)\s+(?:islam|kristen|katolik|hindu|buddha)\b"
    )
    .unwrap();
    static ref HAJI_BUREAU: Regex =
        Regex::new(r"\bbidang\s+penyelenggara\s+haji\b|\bpenyelenggara\s+umroh\b").unwrap();

    /// Longer names come before the shorter names they contain
    static ref LOCALITY_TOKENS: Vec<(Regex, IndukUnit)> = vec![
        (Regex::new(r"\bsumbawa\s+barat\b").unwrap(), IndukUnit::SumbawaBarat),
        (Regex::new(r"\bkota\s+bima\b").unwrap(), IndukUnit::KotaBima),
        (Regex::new(r"\bbima\b").unwrap(), IndukUnit::KabupatenBima),
        (Regex::new(r"\bmataram\b").unwrap(), IndukUnit::KotaMataram),
        (Regex::new(r"\bdompu\b").unwrap(), IndukUnit::Dompu),
        (Regex::new(r"\blombok\s+barat\b").unwrap(), IndukUnit::LombokBarat),
        (Regex::new(r"\blombok\s+tengah\b").unwrap(), IndukUnit::LombokTengah),
        (Regex::new(r"\blombok\s+timur\b").unwrap(), IndukUnit::LombokTimur),
        (Regex::new(r"\blombok\s+utara\b").unwrap(), IndukUnit::LombokUtara),
        (Regex::new(r"\bsumbawa\b").unwrap(), IndukUnit::Sumbawa),
    ];

    /// Kecamatan Alas lies in Kabupaten Sumbawa Barat
    static ref ALAS: Regex = Regex::new(r"\balas\b").unwrap();

    static ref UNIT_KOTA: Regex = Regex::new(r"\bkota\s+([a-z\s]+)\b").unwrap();
    static ref UNIT_KAB: Regex = Regex::new(r"\bkab(?:upaten)?\s+([a-z\s]+)\b").unwrap();

    static ref HINT_KANTOR_PREFIX: Regex =
        Regex::new(r"^\s*kantor\s+kementerian\s+agama\s+").unwrap();
    static ref HINT_KEMENAG_PREFIX: Regex = Regex::new(r"^\s*kementerian\s+agama\s+").unwrap();
    static ref HINT_KOTA: Regex = Regex::new(r"^kota\s+(.+)$").unwrap();
    static ref HINT_KAB: Regex = Regex::new(r"^kab(?:upaten)?\s+(.+)$").unwrap();
}

/// Second-level division named in the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Division {
    Kota,
    Kabupaten,
}

/// Map a bare locality name ("mataram", "lombok barat") to its unit
fn lookup_locality(division: Division, name: &str) -> Option<IndukUnit> {
    let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
    match (division, name.as_str()) {
        (Division::Kota, "mataram") => Some(IndukUnit::KotaMataram),
        (Division::Kota, "bima") => Some(IndukUnit::KotaBima),
        (Division::Kabupaten, "lombok barat") => Some(IndukUnit::LombokBarat),
        (Division::Kabupaten, "lombok tengah") => Some(IndukUnit::LombokTengah),
        (Division::Kabupaten, "lombok timur") => Some(IndukUnit::LombokTimur),
        (Division::Kabupaten, "lombok utara") => Some(IndukUnit::LombokUtara),
        (Division::Kabupaten, "sumbawa barat") => Some(IndukUnit::SumbawaBarat),
        (Division::Kabupaten, "sumbawa") => Some(IndukUnit::Sumbawa),
        (Division::Kabupaten, "dompu") => Some(IndukUnit::Dompu),
        (Division::Kabupaten, "bima") => Some(IndukUnit::KabupatenBima),
        _ => None,
    }
}

fn capture_locality(re: &Regex, division: Division, text: &str) -> Option<IndukUnit> {
    let captured = re.captures(text)?.get(1)?.as_str();
    let name = TRAILING_PROVINSI.replace(captured.trim(), "");
    lookup_locality(division, name.trim())
}

/// Lower-cased, trimmed classifier input
#[derive(Debug)]
struct Normalized {
    unit: String,
    kab_kota: String,
    jabatan: String,
}

impl Normalized {
    fn new(unit: Option<&str>, kab_kota: Option<&str>, jabatan: Option<&str>) -> Self {
        let normalize = |s: Option<&str>| s.unwrap_or_default().trim().to_lowercase();

        let kab_kota = normalize(kab_kota);
        let mut unit = normalize(unit);
        if unit.is_empty() {
            unit = kab_kota.clone();
        }

        Self {
            unit,
            kab_kota,
            jabatan: normalize(jabatan),
        }
    }
}

struct Rule {
    name: &'static str,
    apply: fn(&Normalized) -> Option<IndukUnit>,
}

/// Evaluated top to bottom, first hit wins
const RULES: &[Rule] = &[
    Rule {
        name: "generic_unit_position",
        apply: generic_unit_from_position,
    },
    Rule {
        name: "provincial_office",
        apply: provincial_office,
    },
    Rule {
        name: "locality_token",
        apply: locality_token,
    },
    Rule {
        name: "kecamatan_alas",
        apply: kecamatan_alas,
    },
    Rule {
        name: "unit_kota_kabupaten",
        apply: unit_kota_kabupaten,
    },
    Rule {
        name: "kab_kota_hint",
        apply: kab_kota_hint,
    },
];

/// Generic administrative sub-units (Sub Bagian Tata Usaha etc.) exist in
/// every office, so the position text decides. Checked before Kanwil
/// detection.
fn generic_unit_from_position(input: &Normalized) -> Option<IndukUnit> {
    let unit = &input.unit;
    let is_generic = SUB_BAGIAN.is_match(unit)
        || (TATA_USAHA.is_match(unit) && !BAGIAN_TATA_USAHA.is_match(unit));
    if !is_generic || input.jabatan.is_empty() {
        return None;
    }

    let jabatan = &input.jabatan;
    capture_locality(&POSITION_KOTA, Division::Kota, jabatan)
        .or_else(|| capture_locality(&POSITION_KAB, Division::Kabupaten, jabatan))
        .or_else(|| capture_locality(&POSITION_KANTOR_KOTA, Division::Kota, jabatan))
        .or_else(|| capture_locality(&POSITION_KANTOR_KAB, Division::Kabupaten, jabatan))
}

fn provincial_office(input: &Normalized) -> Option<IndukUnit> {
    let unit = &input.unit;
    let is_bagian_tata_usaha =
        BAGIAN_TATA_USAHA.is_match(unit) && !SUB_BAGIAN_TATA_USAHA.is_match(unit);

    let is_kanwil = is_bagian_tata_usaha
        || KANWIL_INDICATOR.is_match(unit)
        || BIMAS_BUREAU.is_match(unit)
        || HAJI_BUREAU.is_match(unit);

    is_kanwil.then_some(IndukUnit::Kanwil)
}

fn locality_token(input: &Normalized) -> Option<IndukUnit> {
    LOCALITY_TOKENS
        .iter()
        .find(|(re, _)| re.is_match(&input.unit))
        .map(|(_, unit)| *unit)
}

fn kecamatan_alas(input: &Normalized) -> Option<IndukUnit> {
    ALAS.is_match(&input.unit).then_some(IndukUnit::SumbawaBarat)
}

fn unit_kota_kabupaten(input: &Normalized) -> Option<IndukUnit> {
    capture_locality(&UNIT_KOTA, Division::Kota, &input.unit)
        .or_else(|| capture_locality(&UNIT_KAB, Division::Kabupaten, &input.unit))
}

fn kab_kota_hint(input: &Normalized) -> Option<IndukUnit> {
    if input.kab_kota.is_empty() {
        return None;
    }

    let hint = HINT_KANTOR_PREFIX.replace(&input.kab_kota, "");
    let hint = HINT_KEMENAG_PREFIX.replace(&hint, "");

    if let Some(caps) = HINT_KOTA.captures(&hint) {
        return lookup_locality(Division::Kota, &caps[1]);
    }
    HINT_KAB
        .captures(&hint)
        .and_then(|caps| lookup_locality(Division::Kabupaten, &caps[1]))
}

/// Classify an employee's workplace texts into its canonical parent unit.
///
/// `unit` is the workplace name (`SATUAN_KERJA`), `kab_kota` the
/// regency/city hint and `jabatan` the position description
/// (`KET_JABATAN`). Missing or blank inputs are allowed; anything that no
/// rule recognises belongs to the provincial office.
pub fn classify(unit: Option<&str>, kab_kota: Option<&str>, jabatan: Option<&str>) -> IndukUnit {
    let input = Normalized::new(unit, kab_kota, jabatan);
    for rule in RULES {
        if let Some(induk) = (rule.apply)(&input) {
            tracing::trace!(rule = rule.name, induk = %induk, "Induk unit resolved");
            return induk;
        }
    }
    IndukUnit::Kanwil
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_str(unit: &str, kab_kota: &str, jabatan: &str) -> IndukUnit {
        classify(Some(unit), Some(kab_kota), Some(jabatan))
    }

    #[test]
    fn test_canonical_names_classify_to_themselves() {
        for unit in IndukUnit::ALL {
            assert_eq!(classify_str(unit.name(), "", ""), unit, "{}", unit);
        }
    }

    #[test]
    fn test_generic_unit_uses_position_before_kanwil() {
        let jabatan = "Penata Layanan Operasional pada Sub Bagian Tata Usaha Kantor Kementerian Agama Kota Mataram Provinsi Nusa Tenggara Barat";
        assert_eq!(
            classify_str("Sub Bagian Tata Usaha", "", jabatan),
            IndukUnit::KotaMataram
        );
    }

    #[test]
    fn test_generic_unit_kabupaten_position() {
        let jabatan = "Kepala Subbag Tata Usaha Kantor Kementerian Agama Kabupaten Lombok Timur Provinsi Nusa Tenggara Barat";
        assert_eq!(
            classify_str("Subbag Tata Usaha", "", jabatan),
            IndukUnit::LombokTimur
        );

        let jabatan = "Pengadministrasi Umum Kab Sumbawa Barat";
        assert_eq!(
            classify_str("Tata Usaha", "", jabatan),
            IndukUnit::SumbawaBarat
        );
    }

    #[test]
    fn test_generic_unit_override_beats_kanwil_indicator() {
        // Override runs first even when the unit text also names the Kanwil
        let jabatan = "Analis Kepegawaian Kantor Kementerian Agama Kabupaten Dompu";
        assert_eq!(
            classify_str("Sub Bagian Tata Usaha Kanwil", "", jabatan),
            IndukUnit::Dompu
        );
    }

    #[test]
    fn test_generic_unit_without_position_falls_through() {
        assert_eq!(
            classify_str("Sub Bagian Tata Usaha", "", ""),
            IndukUnit::Kanwil
        );
        assert_eq!(
            classify_str("Sub Bagian Tata Usaha", "Kota Bima", ""),
            IndukUnit::KotaBima
        );
    }

    #[test]
    fn test_generic_unit_unknown_position_locality() {
        // Unrecognised locality in the position text does not short-circuit
        let jabatan = "Pengelola Kepegawaian Kota Denpasar";
        assert_eq!(
            classify_str("Sub Bagian Tata Usaha", "Kabupaten Lombok Utara", jabatan),
            IndukUnit::LombokUtara
        );
    }

    #[test]
    fn test_bagian_tata_usaha_is_kanwil() {
        assert_eq!(classify_str("Bagian Tata Usaha", "", ""), IndukUnit::Kanwil);
    }

    #[test]
    fn test_kanwil_bureaus() {
        for unit in [
            "Bidang Bimas Islam",
            "Pembimbing Masyarakat Kristen",
            "Pembimbing Masyarakat Katolik",
            "Bimas Hindu",
            "Bimas Buddha",
            "Bidang Penyelenggara Haji dan Umrah",
            "Seksi Penyelenggara Umroh",
            "Kanwil Kemenag NTB",
        ] {
            assert_eq!(classify_str(unit, "", ""), IndukUnit::Kanwil, "{}", unit);
        }
    }

    #[test]
    fn test_kanwil_indicator_beats_locality() {
        assert_eq!(
            classify_str("Bimas Islam Kota Mataram", "", ""),
            IndukUnit::Kanwil
        );
    }

    #[test]
    fn test_kota_bima_precedes_bima() {
        assert_eq!(
            classify_str("Kantor Urusan Agama Kota Bima", "", ""),
            IndukUnit::KotaBima
        );
        assert_eq!(
            classify_str("KUA Kecamatan Woha Bima", "", ""),
            IndukUnit::KabupatenBima
        );
    }

    #[test]
    fn test_sumbawa_barat_precedes_sumbawa() {
        assert_eq!(
            classify_str("MTsN 1 Sumbawa Barat", "", ""),
            IndukUnit::SumbawaBarat
        );
        assert_eq!(classify_str("MAN 2 Sumbawa", "", ""), IndukUnit::Sumbawa);
    }

    #[test]
    fn test_kecamatan_alas() {
        assert_eq!(
            classify_str("KUA Kecamatan Alas", "", ""),
            IndukUnit::SumbawaBarat
        );
        // word boundary, "kelas" is not "alas"
        assert_eq!(classify_str("Kelas Jauh MTs", "", ""), IndukUnit::Kanwil);
    }

    #[test]
    fn test_empty_unit_uses_hint() {
        assert_eq!(classify_str("", "Kab Dompu", ""), IndukUnit::Dompu);
        assert_eq!(classify(None, Some("  Kota Mataram "), None), IndukUnit::KotaMataram);
    }

    #[test]
    fn test_hint_fallback_strips_kemenag_prefix() {
        assert_eq!(
            classify_str(
                "KUA Kecamatan Praya",
                "Kantor Kementerian Agama Kabupaten Lombok Tengah",
                ""
            ),
            IndukUnit::LombokTengah
        );
        assert_eq!(
            classify_str("MIN 3", "Kementerian Agama Kota Bima", ""),
            IndukUnit::KotaBima
        );
        assert_eq!(
            classify_str("MIN 3", "KAB. Antah Berantah", ""),
            IndukUnit::Kanwil
        );
    }

    #[test]
    fn test_default_is_kanwil() {
        assert_eq!(classify_str("", "", ""), IndukUnit::Kanwil);
        assert_eq!(classify(None, None, None), IndukUnit::Kanwil);
        assert_eq!(classify_str("   ", "", "   "), IndukUnit::Kanwil);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            classify_str("kua KECAMATAN gerung LoMbOk BaRaT", "", ""),
            IndukUnit::LombokBarat
        );
    }

    #[test]
    fn test_classify_is_deterministic_across_threads() {
        let samples = [
            ("Sub Bagian Tata Usaha", "", "Staf Kabupaten Bima Provinsi NTB"),
            ("KUA Kecamatan Alas", "", ""),
            ("", "Kab Dompu", ""),
            ("Bagian Tata Usaha", "Kota Mataram", ""),
        ];
        let expected: Vec<IndukUnit> = samples
            .iter()
            .map(|(u, k, j)| classify_str(u, k, j))
            .collect();
        assert_eq!(expected[0], IndukUnit::KabupatenBima);

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        samples
                            .iter()
                            .map(|(u, k, j)| classify_str(u, k, j))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn test_from_name_and_location_name() {
        assert_eq!(
            IndukUnit::from_name("Kantor Kementerian Agama Kabupaten Dompu"),
            Some(IndukUnit::Dompu)
        );
        assert_eq!(IndukUnit::from_name("Kabupaten Dompu"), None);
        assert_eq!(IndukUnit::Kanwil.location_name(), "Nusa Tenggara Barat");
        assert_eq!(IndukUnit::KotaBima.location_name(), "Kota Bima");
        assert_eq!(
            IndukUnit::SumbawaBarat.location_name(),
            "Kabupaten Sumbawa Barat"
        );
    }

    #[test]
    fn test_serializes_as_canonical_name() {
        let json = serde_json::to_string(&IndukUnit::LombokUtara).unwrap();
        assert_eq!(json, "\"Kantor Kementerian Agama Kabupaten Lombok Utara\"");
        let parsed: IndukUnit = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, IndukUnit::LombokUtara);
    }
}
