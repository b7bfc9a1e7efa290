use std::sync::Arc;

use chrono::NaiveDate;
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{PgPool, Postgres};

use crate::core::error::{AppError, Result};
use crate::features::coordinates::CoordinateService;
use crate::features::employees::dtos::{
    ByLocationResponseDto, CreateEmployeeDto, DistinctColumn, EmployeeFilter, EmployeeResponseDto,
    EmployeeStatisticsDto, HeatmapKind, HeatmapPointDto, JabatanOptionDto, LocationFilter,
    UpdateEmployeeDto,
};
use crate::features::employees::models::{today_wita, Employee, EmployeeStatus};
use crate::features::employees::services::aggregation;

const EMPLOYEE_COLUMNS: &str = r#"
    nip, nip_baru, nama_lengkap, kode_pangkat, gol_ruang, pangkat_asn, tmt_pangkat,
    mk_tahun, mk_bulan, kode_satuan_kerja, satuan_kerja, kode_jabatan, ket_jabatan,
    tmt_jabatan, nama_sekolah, kode_jenjang_pendidikan, jenjang_pendidikan, akta,
    fakultas_pendidikan, jurusan, tahun_lulus, tgl_lahir, tempat_lahir, isi_unit_kerja,
    kab_kota, tmt_pensiun, tmt_cpns
"#;

/// `$1` = golongan, `$2` = kode_jabatan, `$3` = jabatan, `$4` = status, `$5` = today
const FILTER_CLAUSE: &str = r#"
    WHERE ($1::text IS NULL OR gol_ruang = $1)
      AND ($2::text IS NULL OR kode_jabatan = $2)
      AND ($3::text IS NULL OR ket_jabatan = $3)
      AND ($4::text IS NULL
           OR ($4 = 'aktif' AND (tmt_pensiun IS NULL OR tmt_pensiun > $5))
           OR ($4 = 'pensiun' AND tmt_pensiun <= $5))
"#;

const NIP_TAKEN: &str = "An employee with this NIP_BARU already exists";

/// Bind all columns in `EMPLOYEE_COLUMNS` order
fn bind_employee<'q>(
    query: Query<'q, Postgres, PgArguments>,
    e: &'q Employee,
) -> Query<'q, Postgres, PgArguments> {
    query
        .bind(&e.nip)
        .bind(&e.nip_baru)
        .bind(&e.nama_lengkap)
        .bind(&e.kode_pangkat)
        .bind(&e.gol_ruang)
        .bind(&e.pangkat_asn)
        .bind(e.tmt_pangkat)
        .bind(e.mk_tahun)
        .bind(e.mk_bulan)
        .bind(&e.kode_satuan_kerja)
        .bind(&e.satuan_kerja)
        .bind(&e.kode_jabatan)
        .bind(&e.ket_jabatan)
        .bind(e.tmt_jabatan)
        .bind(&e.nama_sekolah)
        .bind(&e.kode_jenjang_pendidikan)
        .bind(&e.jenjang_pendidikan)
        .bind(&e.akta)
        .bind(&e.fakultas_pendidikan)
        .bind(&e.jurusan)
        .bind(e.tahun_lulus)
        .bind(e.tgl_lahir)
        .bind(&e.tempat_lahir)
        .bind(&e.isi_unit_kerja)
        .bind(&e.kab_kota)
        .bind(e.tmt_pensiun)
        .bind(e.tmt_cpns)
}

/// Service for employee records and the reports derived from them
pub struct EmployeeService {
    pool: PgPool,
    coordinates: Arc<CoordinateService>,
}

impl EmployeeService {
    pub fn new(pool: PgPool, coordinates: Arc<CoordinateService>) -> Self {
        Self { pool, coordinates }
    }

    /// Rows matching the column filters; the induk unit is applied by callers
    async fn fetch(
        &self,
        filter: &EmployeeFilter,
        today: NaiveDate,
    ) -> Result<Vec<Employee>> {
        sqlx::query_as::<_, Employee>(&format!(
            "SELECT {} FROM employees {}",
            EMPLOYEE_COLUMNS, FILTER_CLAUSE
        ))
        .bind(&filter.golongan)
        .bind(&filter.kode_jabatan)
        .bind(&filter.jabatan)
        .bind(filter.status.map(EmployeeStatus::as_str))
        .bind(today)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list employees: {:?}", e);
            AppError::Database(e)
        })
    }

    /// All matching employees, provincial office first
    pub async fn list(&self, filter: EmployeeFilter) -> Result<Vec<EmployeeResponseDto>> {
        let today = today_wita();
        let rows = self.fetch(&filter, today).await?;

        let mut employees = aggregation::enrich(rows, filter.induk, today);
        aggregation::sort_for_listing(&mut employees);

        tracing::debug!(total = employees.len(), "Employees listed");
        Ok(employees)
    }

    pub async fn get(&self, nip_baru: &str) -> Result<EmployeeResponseDto> {
        let employee = self.find(nip_baru).await?;
        Ok(EmployeeResponseDto::new(employee, today_wita()))
    }

    async fn find(&self, nip_baru: &str) -> Result<Employee> {
        sqlx::query_as::<_, Employee>(&format!(
            "SELECT {} FROM employees WHERE nip_baru = $1",
            EMPLOYEE_COLUMNS
        ))
        .bind(nip_baru)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get employee: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", nip_baru)))
    }

    pub async fn create(&self, dto: CreateEmployeeDto) -> Result<EmployeeResponseDto> {
        let employee = Employee::from(dto);

        let query = format!(
            r#"
            INSERT INTO employees ({})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                    $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27)
            "#,
            EMPLOYEE_COLUMNS
        );

        bind_employee(sqlx::query(&query), &employee)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create employee: {:?}", e);
                AppError::from_db(e, NIP_TAKEN)
            })?;

        tracing::info!(nip_baru = %employee.nip_baru, "Employee created");
        Ok(EmployeeResponseDto::new(employee, today_wita()))
    }

    /// Apply a partial update. `can_change_nip` gates renaming the key.
    pub async fn update(
        &self,
        nip_baru: &str,
        dto: UpdateEmployeeDto,
        can_change_nip: bool,
    ) -> Result<EmployeeResponseDto> {
        let mut employee = self.find(nip_baru).await?;
        dto.apply(&mut employee, can_change_nip);

        let query = r#"
            UPDATE employees SET
                nip = $1, nip_baru = $2, nama_lengkap = $3, kode_pangkat = $4,
                gol_ruang = $5, pangkat_asn = $6, tmt_pangkat = $7, mk_tahun = $8,
                mk_bulan = $9, kode_satuan_kerja = $10, satuan_kerja = $11,
                kode_jabatan = $12, ket_jabatan = $13, tmt_jabatan = $14,
                nama_sekolah = $15, kode_jenjang_pendidikan = $16,
                jenjang_pendidikan = $17, akta = $18, fakultas_pendidikan = $19,
                jurusan = $20, tahun_lulus = $21, tgl_lahir = $22, tempat_lahir = $23,
                isi_unit_kerja = $24, kab_kota = $25, tmt_pensiun = $26, tmt_cpns = $27
            WHERE nip_baru = $28
        "#;

        let result = bind_employee(sqlx::query(query), &employee)
            .bind(nip_baru)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update employee: {:?}", e);
                AppError::from_db(e, NIP_TAKEN)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Employee {} not found", nip_baru)));
        }

        tracing::info!(nip_baru = %nip_baru, new_nip_baru = %employee.nip_baru, "Employee updated");
        Ok(EmployeeResponseDto::new(employee, today_wita()))
    }

    pub async fn delete(&self, nip_baru: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM employees WHERE nip_baru = $1")
            .bind(nip_baru)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete employee: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Employee {} not found", nip_baru)));
        }

        tracing::info!(nip_baru = %nip_baru, "Employee deleted");
        Ok(())
    }

    pub async fn statistics(&self) -> Result<EmployeeStatisticsDto> {
        sqlx::query_as::<_, EmployeeStatisticsDto>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE tmt_pensiun IS NULL OR tmt_pensiun > $1) AS aktif,
                COUNT(*) FILTER (WHERE tmt_pensiun <= $1) AS pensiun
            FROM employees
            "#,
        )
        .bind(today_wita())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to compute employee statistics: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Per-unit counts for units that have a coordinate
    pub async fn heatmap(
        &self,
        kind: HeatmapKind,
        include_inactive: bool,
    ) -> Result<Vec<HeatmapPointDto>> {
        let today = today_wita();
        let filter = EmployeeFilter {
            status: (!include_inactive).then_some(EmployeeStatus::Aktif),
            ..Default::default()
        };

        let units = kind.units();
        let rows = self.fetch(&filter, today).await?;
        let counts = aggregation::tally_by_unit(&rows, today);
        let coordinates = self.coordinates.for_units(&units).await?;

        Ok(aggregation::build_heatmap(&units, &counts, &coordinates))
    }

    /// Employees of one unit, sorted by name, with counts over the same set
    pub async fn by_location(&self, filter: LocationFilter) -> Result<ByLocationResponseDto> {
        let today = today_wita();
        let column_filter = EmployeeFilter {
            status: filter.status,
            ..Default::default()
        };

        let rows = self.fetch(&column_filter, today).await?;
        let mut employees = aggregation::enrich(rows, Some(filter.induk), today);
        aggregation::sort_by_name(&mut employees);

        Ok(ByLocationResponseDto {
            location: filter.location,
            induk_unit: filter.induk,
            statistics: aggregation::statistics(&employees),
            employees,
        })
    }

    /// Sorted distinct non-blank values of a whitelisted column
    pub async fn distinct(&self, column: DistinctColumn) -> Result<Vec<String>> {
        let column = column.sql_column();

        sqlx::query_scalar::<_, String>(&format!(
            "SELECT DISTINCT {col} FROM employees
             WHERE {col} IS NOT NULL AND TRIM({col}) <> ''
             ORDER BY {col}",
            col = column
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list distinct {}: {:?}", column, e);
            AppError::Database(e)
        })
    }

    pub async fn jabatan_options(&self) -> Result<Vec<JabatanOptionDto>> {
        let rows = sqlx::query_as::<_, (Option<String>, Option<String>)>(
            r#"
            SELECT kode_jabatan, ket_jabatan
            FROM employees
            WHERE kode_jabatan IS NOT NULL
            ORDER BY kode_jabatan, nip_baru
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list jabatan options: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(aggregation::jabatan_options(rows))
    }
}
