use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use sea_orm::{EntityTrait, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{
        account::{self, Entity as AccountEntity},
        journal_entry::JournalType,
    },
    errors::ServiceError,
    services::journal::{
        unique_transaction_number, JournalLine, JournalService, NewJournal, PostedJournal,
        DEFAULT_PREFIX,
    },
};

/// Which side of the entry a template line posts to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Debit,
    Credit,
}

/// One line of a transaction template, resolved to a concrete account at
/// instantiation time.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateLine {
    pub account_kind: &'static str,
    pub side: Side,
    pub description: &'static str,
}

/// A named preset mapping a common business event to its debit/credit lines.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub lines: Vec<TemplateLine>,
}

/// Caller-supplied amount for one template line, matched by position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateAmount {
    pub amount: Decimal,
    /// Product reference for inventory lines, so stock can be applied
    pub product_id: Option<Uuid>,
}

fn d(account_kind: &'static str, description: &'static str) -> TemplateLine {
    TemplateLine {
        account_kind,
        side: Side::Debit,
        description,
    }
}

fn c(account_kind: &'static str, description: &'static str) -> TemplateLine {
    TemplateLine {
        account_kind,
        side: Side::Credit,
        description,
    }
}

fn t(
    key: &'static str,
    name: &'static str,
    description: &'static str,
    lines: Vec<TemplateLine>,
) -> TransactionTemplate {
    TransactionTemplate {
        key,
        name,
        description,
        lines,
    }
}

/// The static template catalog. Read-only reference data.
pub static TEMPLATES: Lazy<Vec<TransactionTemplate>> = Lazy::new(|| {
    vec![
        t(
            "saldo_awal",
            "Saldo Awal Usaha",
            "Pencatatan saldo awal usaha Kang-Mas Shop",
            vec![
                d("kas", "Saldo awal kas"),
                d("persediaan", "Saldo awal persediaan barang dagang"),
                d("peralatan", "Saldo awal peralatan toko"),
                d("perlengkapan", "Saldo awal perlengkapan toko"),
                c("pendapatan", "Saldo awal penjualan"),
                c("hutang", "Saldo awal utang dagang"),
            ],
        ),
        t(
            "setoran_modal",
            "Setoran Modal Awal",
            "Kas diterima dari pemilik sebagai modal awal",
            vec![
                d("kas", "Setoran modal pemilik"),
                c("modal", "Modal pemilik"),
            ],
        ),
        t(
            "pembelian_peralatan_kredit",
            "Pembelian Peralatan Kredit",
            "Dibeli beberapa peralatan untuk budidaya ikan secara kredit",
            vec![
                d("peralatan", "Peralatan budidaya"),
                c("hutang", "Utang dagang"),
            ],
        ),
        t(
            "pembelian_perlengkapan_tunai",
            "Pembelian Perlengkapan Tunai",
            "Dibeli kebutuhan perlengkapan budidaya ikan mas secara tunai",
            vec![
                d("perlengkapan", "Perlengkapan budidaya"),
                c("kas", "Pembayaran tunai"),
            ],
        ),
        t(
            "pembelian_bibit_campur",
            "Pembelian Bibit Ikan Mas (Tunai + Kredit)",
            "Dibeli 2.000 ekor bibit ikan mas (1.500 tunai, 500 kredit)",
            vec![
                d("persediaan", "Bibit ikan mas 2000 ekor"),
                c("kas", "Pembayaran tunai 1500 ekor"),
                c("hutang", "Utang 500 ekor"),
            ],
        ),
        t(
            "pelunasan_utang_peralatan",
            "Pelunasan Utang Peralatan",
            "Membayar faktur pembelian dari Toko Abc",
            vec![
                d("hutang", "Pelunasan utang peralatan"),
                c("kas", "Pembayaran kas"),
            ],
        ),
        t(
            "pelunasan_utang_bibit",
            "Pelunasan Utang Pembelian Bibit",
            "Membayar faktur pembelian bibit dari pengepul",
            vec![
                d("hutang", "Pelunasan utang bibit"),
                c("kas", "Pembayaran kas"),
            ],
        ),
        t(
            "pembelian_peralatan_tunai",
            "Pembelian Peralatan Tunai",
            "Pembelian baskom, sortir, serokan secara tunai",
            vec![
                d("peralatan", "Peralatan tambahan"),
                c("kas", "Pembayaran tunai"),
            ],
        ),
        t(
            "pembelian_obat_ikan",
            "Pembelian Obat Ikan Tunai",
            "Pembelian obat pencegah penyakit ikan",
            vec![d("perlengkapan", "Obat ikan"), c("kas", "Pembayaran tunai")],
        ),
        t(
            "biaya_listrik",
            "Pembayaran Biaya Listrik",
            "Pembayaran biaya listrik bulanan",
            vec![
                d("beban_listrik", "Biaya listrik"),
                c("kas", "Pembayaran tunai"),
            ],
        ),
        t(
            "penjualan_bibit_kredit",
            "Penjualan Bibit Ikan Secara Kredit",
            "Penjualan bibit ikan secara kredit",
            vec![
                d("piutang", "Piutang penjualan"),
                c("pendapatan", "Pendapatan penjualan"),
            ],
        ),
        t(
            "penerimaan_piutang",
            "Penerimaan Kas dari Piutang",
            "Penerimaan pembayaran piutang dagang",
            vec![
                d("kas", "Penerimaan kas"),
                c("piutang", "Piutang dilunasi"),
            ],
        ),
        t(
            "penjualan_ikan_tunai",
            "Penjualan Ikan Mas Tunai",
            "Penjualan ikan mas konsumsi secara tunai",
            vec![
                d("kas", "Penerimaan penjualan"),
                c("pendapatan", "Pendapatan penjualan"),
            ],
        ),
        t(
            "biaya_air",
            "Pembayaran Biaya Air",
            "Pembayaran biaya air bulanan",
            vec![
                d("beban_listrik", "Biaya air"),
                c("kas", "Pembayaran tunai"),
            ],
        ),
        t(
            "kerugian_ikan_mati",
            "Kerugian Akibat Ikan Mati",
            "Kerugian akibat ikan mati tidak bisa dijual",
            vec![
                d("beban_kerugian", "Beban kerugian ikan mati"),
                c("persediaan", "Pengurangan persediaan"),
            ],
        ),
        t(
            "biaya_reparasi",
            "Biaya Reparasi Kendaraan",
            "Biaya reparasi kendaraan operasional",
            vec![
                d("beban_lain", "Biaya reparasi"),
                c("kas", "Pembayaran tunai"),
            ],
        ),
        t(
            "penjualan_bibit_tunai",
            "Penjualan Bibit Ikan Mas Tunai",
            "Penjualan bibit ikan mas secara tunai",
            vec![
                d("kas", "Penerimaan penjualan"),
                c("pendapatan", "Pendapatan penjualan"),
            ],
        ),
        t(
            "penjualan_dengan_pengiriman",
            "Penjualan + Beban Pengiriman",
            "Penjualan bibit dengan biaya pengiriman ditanggung penjual",
            vec![
                d("kas", "Penerimaan penjualan"),
                c("pendapatan", "Pendapatan penjualan"),
                d("beban_transport", "Biaya pengiriman"),
                c("kas", "Pembayaran biaya pengiriman"),
            ],
        ),
        t(
            "pembelian_bibit_tunai",
            "Pembelian Bibit Ikan Mas Tunai",
            "Pembelian bibit ikan mas tambahan secara tunai",
            vec![
                d("persediaan", "Bibit ikan tambahan"),
                c("kas", "Pembayaran tunai"),
            ],
        ),
        t(
            "penjualan_ikan_ongkir",
            "Penjualan Ikan + Ongkir Pembeli",
            "Penjualan ikan mas tunai dengan ongkir ditanggung pembeli",
            vec![
                d("kas", "Penerimaan penjualan termasuk ongkir"),
                c("pendapatan", "Pendapatan penjualan"),
            ],
        ),
        t(
            "kerugian_hibah",
            "Kerugian Hibah Bibit",
            "Kerugian akibat pemberian bibit ke saudara",
            vec![
                d("beban_kerugian", "Kerugian hibah bibit"),
                c("persediaan", "Pengurangan persediaan"),
            ],
        ),
        t(
            "pembelian_perlengkapan_peralatan",
            "Pembelian Perlengkapan & Peralatan",
            "Pembelian perlengkapan dan peralatan secara tunai",
            vec![
                d("perlengkapan", "Pembelian perlengkapan"),
                d("peralatan", "Pembelian peralatan"),
                c("kas", "Pembayaran tunai"),
            ],
        ),
        t(
            "penyusutan_peralatan",
            "Penyusutan Peralatan",
            "Penyusutan peralatan bulanan",
            vec![
                d("beban_penyusutan", "Beban penyusutan"),
                c("akumulasi_penyusutan", "Akumulasi penyusutan"),
            ],
        ),
        t(
            "pemakaian_perlengkapan",
            "Pemakaian Perlengkapan",
            "Pemakaian perlengkapan bulanan",
            vec![
                d("beban_perlengkapan", "Beban perlengkapan"),
                c("perlengkapan", "Pengurangan perlengkapan"),
            ],
        ),
    ]
});

/// Materialises templates into concrete journals via the journal engine.
#[derive(Clone)]
pub struct TemplateService {
    db: Arc<DbPool>,
    journal: Arc<JournalService>,
}

impl TemplateService {
    pub fn new(db: Arc<DbPool>, journal: Arc<JournalService>) -> Self {
        Self { db, journal }
    }

    pub fn catalog(&self) -> &'static [TransactionTemplate] {
        &TEMPLATES
    }

    pub fn get(&self, key: &str) -> Result<&'static TransactionTemplate, ServiceError> {
        TEMPLATES
            .iter()
            .find(|t| t.key == key)
            .ok_or_else(|| ServiceError::NotFound(format!("template '{}' not found", key)))
    }

    /// Resolves a template into a journal entry.
    ///
    /// `amounts` maps to the template's lines by position and must cover
    /// every line with a positive amount; an account kind with no mapped
    /// account is an error, never a silently dropped line.
    #[instrument(skip(self, amounts), fields(template = key))]
    pub async fn instantiate(
        &self,
        key: &str,
        date: DateTime<Utc>,
        amounts: Vec<TemplateAmount>,
    ) -> Result<PostedJournal, ServiceError> {
        let template = self.get(key)?;

        if amounts.len() != template.lines.len() {
            return Err(ServiceError::ValidationError(format!(
                "template '{}' has {} lines but {} amounts were supplied",
                key,
                template.lines.len(),
                amounts.len()
            )));
        }
        if let Some(position) = amounts.iter().position(|a| a.amount <= Decimal::ZERO) {
            return Err(ServiceError::ValidationError(format!(
                "line {}: template amounts must be positive",
                position + 1
            )));
        }

        let accounts_by_kind = self.accounts_by_kind().await?;

        let mut lines = Vec::with_capacity(template.lines.len());
        for (template_line, input) in template.lines.iter().zip(amounts) {
            let account_id = *accounts_by_kind
                .get(template_line.account_kind)
                .ok_or_else(|| {
                    ServiceError::NotFound(format!(
                        "no account mapped for kind '{}'",
                        template_line.account_kind
                    ))
                })?;

            let (debit, credit) = match template_line.side {
                Side::Debit => (input.amount, Decimal::ZERO),
                Side::Credit => (Decimal::ZERO, input.amount),
            };
            lines.push(JournalLine {
                account_id,
                debit,
                credit,
                description: Some(template_line.description.to_string()),
                product_id: input.product_id,
            });
        }

        self.journal
            .post_journal(NewJournal {
                transaction_number: unique_transaction_number(DEFAULT_PREFIX),
                date,
                description: template.description.to_string(),
                journal_type: JournalType::General,
                lines,
            })
            .await
    }

    /// First account per kind, lowest code wins.
    async fn accounts_by_kind(&self) -> Result<HashMap<String, Uuid>, ServiceError> {
        let accounts = AccountEntity::find()
            .order_by_asc(account::Column::Code)
            .all(&*self.db)
            .await?;

        let mut map = HashMap::new();
        for acc in accounts {
            map.entry(acc.kind).or_insert(acc.id);
        }
        Ok(map)
    }
}
