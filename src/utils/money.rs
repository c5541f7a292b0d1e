use rust_decimal::Decimal;
use validator::ValidationError;

/// Plafond de tout montant saisi (prix unitaire, total d'un mouvement)
pub const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000;

pub fn max_amount() -> Decimal {
    Decimal::from(MAX_AMOUNT_UNITS)
}

/// Validateur `custom` pour les montants: 0 <= montant <= plafond
pub fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::new("negative_amount"));
    }
    if *amount > max_amount() {
        return Err(ValidationError::new("amount_too_large"));
    }
    Ok(())
}

/// Quantité x prix unitaire, None si le résultat dépasse Decimal::MAX
pub fn checked_line_total(unit_price: Decimal, quantity: i32) -> Option<Decimal> {
    unit_price.checked_mul(Decimal::from(quantity))
}

/// Somme sans panique, None au premier dépassement
pub fn checked_sum<I>(amounts: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
}
