//! In-memory shaping of employee rows.
//!
//! The induk unit only exists after classification, so ordering, unit
//! filters and per-unit counts happen here rather than in SQL.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;

use crate::features::employees::dtos::{
    EmployeeResponseDto, EmployeeStatisticsDto, HeatmapPointDto, JabatanOptionDto,
};
use crate::features::employees::models::{Employee, EmployeeStatus};
use crate::shared::induk_unit::IndukUnit;

fn name_key(e: &EmployeeResponseDto) -> String {
    e.nama_lengkap.as_deref().unwrap_or_default().to_lowercase()
}

/// Provincial office first, then by unit name, then by name (case-insensitive)
pub fn listing_order(a: &EmployeeResponseDto, b: &EmployeeResponseDto) -> Ordering {
    b.induk_unit
        .is_kanwil()
        .cmp(&a.induk_unit.is_kanwil())
        .then_with(|| {
            a.induk_unit
                .name()
                .to_lowercase()
                .cmp(&b.induk_unit.name().to_lowercase())
        })
        .then_with(|| name_key(a).cmp(&name_key(b)))
}

pub fn sort_for_listing(employees: &mut [EmployeeResponseDto]) {
    employees.sort_by(listing_order);
}

pub fn sort_by_name(employees: &mut [EmployeeResponseDto]) {
    employees.sort_by_cached_key(name_key);
}

/// Enrich rows and keep those in `induk` (all when `None`)
pub fn enrich(
    employees: Vec<Employee>,
    induk: Option<IndukUnit>,
    today: NaiveDate,
) -> Vec<EmployeeResponseDto> {
    employees
        .into_iter()
        .map(|e| EmployeeResponseDto::new(e, today))
        .filter(|e| induk.is_none_or(|unit| e.induk_unit == unit))
        .collect()
}

pub fn statistics(employees: &[EmployeeResponseDto]) -> EmployeeStatisticsDto {
    employees
        .iter()
        .fold(EmployeeStatisticsDto::default(), |mut stats, e| {
            stats.total += 1;
            match e.status {
                EmployeeStatus::Aktif => stats.aktif += 1,
                EmployeeStatus::Pensiun => stats.pensiun += 1,
            }
            stats
        })
}

/// Per-unit counts in a single pass
pub fn tally_by_unit(
    employees: &[Employee],
    today: NaiveDate,
) -> HashMap<IndukUnit, EmployeeStatisticsDto> {
    let mut counts: HashMap<IndukUnit, EmployeeStatisticsDto> = HashMap::new();
    for e in employees {
        let stats = counts.entry(e.induk_unit()).or_default();
        stats.total += 1;
        match e.status_on(today) {
            EmployeeStatus::Aktif => stats.aktif += 1,
            EmployeeStatus::Pensiun => stats.pensiun += 1,
        }
    }
    counts
}

/// One point per unit that has a coordinate, in `units` order
pub fn build_heatmap(
    units: &[IndukUnit],
    counts: &HashMap<IndukUnit, EmployeeStatisticsDto>,
    coordinates: &HashMap<IndukUnit, (f64, f64)>,
) -> Vec<HeatmapPointDto> {
    units
        .iter()
        .filter_map(|unit| {
            let (latitude, longitude) = *coordinates.get(unit)?;
            let stats = counts.get(unit).copied().unwrap_or_default();
            Some(HeatmapPointDto {
                location: unit.location_name().to_string(),
                induk_unit: *unit,
                count: stats.total,
                aktif: stats.aktif,
                pensiun: stats.pensiun,
                latitude,
                longitude,
            })
        })
        .collect()
}

/// Distinct position codes with the first non-blank description seen.
///
/// Rows must arrive ordered by code.
pub fn jabatan_options<I>(rows: I) -> Vec<JabatanOptionDto>
where
    I: IntoIterator<Item = (Option<String>, Option<String>)>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut options: Vec<(String, Option<String>)> = Vec::new();

    for (code, name) in rows {
        let code = code.unwrap_or_default().trim().to_string();
        if code.is_empty() {
            continue;
        }
        let name = name.filter(|n| !n.trim().is_empty());

        match index.get(&code) {
            Some(&i) => {
                if options[i].1.is_none() {
                    options[i].1 = name;
                }
            }
            None => {
                index.insert(code.clone(), options.len());
                options.push((code, name));
            }
        }
    }

    options
        .into_iter()
        .map(|(code, name)| JabatanOptionDto {
            name: name.unwrap_or_else(|| code.clone()),
            code,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
    }

    fn employee(nip: &str, name: &str, unit: &str, pensiun: Option<(i32, u32, u32)>) -> Employee {
        Employee {
            nip_baru: nip.to_string(),
            nama_lengkap: Some(name.to_string()),
            satuan_kerja: Some(unit.to_string()),
            tmt_pensiun: pensiun.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            ..Default::default()
        }
    }

    fn sample() -> Vec<Employee> {
        vec![
            employee("1", "zainal", "MTsN 2 Kota Mataram", None),
            employee("2", "Ahmad", "MAN 1 Dompu", Some((2024, 1, 1))),
            employee("3", "Budi", "Bidang Pendidikan Madrasah", None),
            employee("4", "aisyah", "MTsN 2 Kota Mataram", Some((2030, 1, 1))),
            employee("5", "Abdul", "Kanwil Kemenag NTB", None),
        ]
    }

    #[test]
    fn test_listing_order_kanwil_first_then_unit_then_name() {
        let mut rows = enrich(sample(), None, today());
        sort_for_listing(&mut rows);

        let order: Vec<&str> = rows.iter().map(|e| e.nip_baru.as_str()).collect();
        // Kanwil (Abdul, Budi), then "...Kabupaten Dompu" < "...Kota Mataram"
        assert_eq!(order, vec!["5", "3", "2", "4", "1"]);
    }

    #[test]
    fn test_enrich_filters_by_unit() {
        let rows = enrich(sample(), Some(IndukUnit::KotaMataram), today());
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|e| e.induk_unit == IndukUnit::KotaMataram));
    }

    #[test]
    fn test_sort_by_name_is_case_insensitive() {
        let mut rows = enrich(sample(), None, today());
        sort_by_name(&mut rows);

        let names: Vec<&str> = rows
            .iter()
            .filter_map(|e| e.nama_lengkap.as_deref())
            .collect();
        assert_eq!(names, vec!["Abdul", "Ahmad", "aisyah", "Budi", "zainal"]);
    }

    #[test]
    fn test_statistics() {
        let rows = enrich(sample(), None, today());
        assert_eq!(
            statistics(&rows),
            EmployeeStatisticsDto {
                total: 5,
                aktif: 4,
                pensiun: 1
            }
        );
    }

    #[test]
    fn test_heatmap_skips_units_without_coordinates() {
        let counts = tally_by_unit(&sample(), today());
        let coordinates = HashMap::from([
            (IndukUnit::KotaMataram, (-8.58, 116.12)),
            (IndukUnit::LombokUtara, (-8.35, 116.15)),
        ]);

        let points = build_heatmap(&IndukUnit::ALL[1..], &counts, &coordinates);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].induk_unit, IndukUnit::KotaMataram);
        assert_eq!(points[0].location, "Kota Mataram");
        assert_eq!(points[0].count, 2);
        assert_eq!(points[0].aktif, 2);
        assert_eq!(points[1].induk_unit, IndukUnit::LombokUtara);
        assert_eq!(points[1].count, 0);
    }

    #[test]
    fn test_tally_counts_retired_separately() {
        let counts = tally_by_unit(&sample(), today());
        let dompu = counts[&IndukUnit::Dompu];
        assert_eq!((dompu.total, dompu.aktif, dompu.pensiun), (1, 0, 1));
        assert_eq!(counts[&IndukUnit::Kanwil].total, 2);
    }

    #[test]
    fn test_jabatan_options_first_non_blank_name() {
        let rows = vec![
            (Some("J01".to_string()), Some("  ".to_string())),
            (Some("J01".to_string()), Some("Guru Ahli Pertama".to_string())),
            (Some(" ".to_string()), Some("Ignored".to_string())),
            (None, Some("Ignored".to_string())),
            (Some("J02".to_string()), Some("Penghulu Ahli Muda".to_string())),
            (Some("J02".to_string()), Some("Penghulu".to_string())),
            (Some("J03".to_string()), None),
        ];

        let options = jabatan_options(rows);

        assert_eq!(
            options,
            vec![
                JabatanOptionDto {
                    code: "J01".to_string(),
                    name: "Guru Ahli Pertama".to_string()
                },
                JabatanOptionDto {
                    code: "J02".to_string(),
                    name: "Penghulu Ahli Muda".to_string()
                },
                JabatanOptionDto {
                    code: "J03".to_string(),
                    name: "J03".to_string()
                },
            ]
        );
    }
}
