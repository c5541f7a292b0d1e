use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait, QuerySelect};

use crate::errors::AppError;
use crate::models::scope::OwnerScope;
use crate::models::{purchase, sale};
use crate::utils::money;

pub const MONTHS_PER_YEAR: usize = 12;

fn overflow() -> AppError {
    AppError::Validation("Total amount is too large to aggregate".to_string())
}

/// Somme des montants
pub fn total<I>(amounts: I) -> Result<Decimal, AppError>
where
    I: IntoIterator<Item = Decimal>,
{
    money::checked_sum(amounts).ok_or_else(overflow)
}

/// Répartit les montants dans 12 cases (index 0 = janvier).
/// Si `year` est fourni, les autres années sont ignorées.
pub fn monthly<I>(entries: I, year: Option<i32>) -> Result<[Decimal; MONTHS_PER_YEAR], AppError>
where
    I: IntoIterator<Item = (NaiveDate, Decimal)>,
{
    let mut buckets = [Decimal::ZERO; MONTHS_PER_YEAR];

    for (date, amount) in entries {
        if year.is_some_and(|y| date.year() != y) {
            continue;
        }
        // month0() est toujours dans 0..12
        let bucket = &mut buckets[date.month0() as usize];
        *bucket = bucket.checked_add(amount).ok_or_else(overflow)?;
    }

    Ok(buckets)
}

pub struct AggregationService;

impl AggregationService {
    /// Total des achats du scope
    pub async fn total_purchase_amount(
        db: &DatabaseConnection,
        scope: OwnerScope,
    ) -> Result<Decimal, AppError> {
        let amounts: Vec<Decimal> = scope
            .apply(purchase::Entity::find(), purchase::Column::UserId)
            .select_only()
            .column(purchase::Column::TotalPurchaseAmount)
            .into_tuple()
            .all(db)
            .await?;

        total(amounts)
    }

    /// Total des ventes du scope
    pub async fn total_sale_amount(
        db: &DatabaseConnection,
        scope: OwnerScope,
    ) -> Result<Decimal, AppError> {
        let amounts: Vec<Decimal> = scope
            .apply(sale::Entity::find(), sale::Column::UserId)
            .select_only()
            .column(sale::Column::TotalSaleAmount)
            .into_tuple()
            .all(db)
            .await?;

        total(amounts)
    }

    /// Achats par mois
    pub async fn monthly_purchases(
        db: &DatabaseConnection,
        scope: OwnerScope,
        year: Option<i32>,
    ) -> Result<[Decimal; MONTHS_PER_YEAR], AppError> {
        let rows: Vec<(NaiveDate, Decimal)> = scope
            .apply(purchase::Entity::find(), purchase::Column::UserId)
            .select_only()
            .column(purchase::Column::PurchaseDate)
            .column(purchase::Column::TotalPurchaseAmount)
            .into_tuple()
            .all(db)
            .await?;

        monthly(rows, year)
    }

    /// Ventes par mois
    pub async fn monthly_sales(
        db: &DatabaseConnection,
        scope: OwnerScope,
        year: Option<i32>,
    ) -> Result<[Decimal; MONTHS_PER_YEAR], AppError> {
        let rows: Vec<(NaiveDate, Decimal)> = scope
            .apply(sale::Entity::find(), sale::Column::UserId)
            .select_only()
            .column(sale::Column::SaleDate)
            .column(sale::Column::TotalSaleAmount)
            .into_tuple()
            .all(db)
            .await?;

        monthly(rows, year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn test_monthly_buckets_sum_to_total() {
        let entries: Vec<(NaiveDate, Decimal)> = (1..=12)
            .map(|m| (date(2024, m, 15), dec(m as i64 * 10)))
            .chain([(date(2024, 3, 1), Decimal::new(525, 2))])
            .collect();

        let buckets = monthly(entries.clone(), None).unwrap();
        let expected_total = total(entries.iter().map(|(_, a)| *a)).unwrap();

        assert_eq!(buckets.len(), 12);
        assert_eq!(buckets.iter().copied().sum::<Decimal>(), expected_total);
        assert_eq!(buckets[0], dec(10));
        assert_eq!(buckets[2], dec(30) + Decimal::new(525, 2));
        assert_eq!(buckets[11], dec(120));
    }

    #[test]
    fn test_monthly_year_filter() {
        let entries = vec![
            (date(2023, 5, 1), dec(100)),
            (date(2024, 5, 1), dec(7)),
        ];

        assert_eq!(monthly(entries.clone(), Some(2024)).unwrap()[4], dec(7));
        assert_eq!(monthly(entries, None).unwrap()[4], dec(107));
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(total(Vec::<Decimal>::new()).unwrap(), Decimal::ZERO);
        assert_eq!(monthly(Vec::new(), None).unwrap(), [Decimal::ZERO; 12]);
    }

    #[test]
    fn test_overflowing_amounts_are_rejected_not_panicking() {
        // deux ventes à 5e28 chacune
        let huge = Decimal::from_i128_with_scale(5 * 10i128.pow(28), 0);

        assert!(matches!(total(vec![huge, huge]), Err(AppError::Validation(_))));
        assert!(matches!(
            monthly(vec![(date(2024, 2, 1), huge), (date(2024, 2, 20), huge)], None),
            Err(AppError::Validation(_))
        ));

        // même montants répartis sur deux mois: chaque case tient
        let buckets = monthly(vec![(date(2024, 2, 1), huge), (date(2024, 3, 1), huge)], None).unwrap();
        assert_eq!(buckets[1], huge);
        assert_eq!(buckets[2], huge);
    }
}
