// ============================================================================
// DTO - REQUÊTES ET RÉPONSES
// ============================================================================
//
// Description:
//   Corps JSON acceptés et renvoyés par l'API. Les noms de champs suivent
//   ceux que le frontend envoie déjà (userId / userID, productID, ...).
//
// Points d'attention:
//   - Les chaînes manquantes valent "" (serde default) pour que validator
//     renvoie un message par champ plutôt qu'une erreur de désérialisation
//   - Les montants sont des Decimal (jamais de f64 pour l'argent)
//
// ============================================================================

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::scope::GUEST_USER_ID;
use crate::models::{product, purchase, sale, store, users};
use crate::utils::money::validate_amount;

// ----------------------------------------------------------------------------
// Auth
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[serde(default)]
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub phone_number: Option<String>,
    pub image_url: Option<String>,
}

/// Profil public d'un utilisateur (jamais de mot de passe)
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub image_url: Option<String>,
    pub is_guest: bool,
}

impl UserProfile {
    /// Profil fixe du mode invité
    pub fn guest() -> Self {
        Self {
            id: GUEST_USER_ID.to_string(),
            first_name: "Guest".to_string(),
            last_name: "User".to_string(),
            email: "guest@example.com".to_string(),
            phone_number: None,
            image_url: None,
            is_guest: true,
        }
    }
}

impl From<users::Model> for UserProfile {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id.to_string(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone_number: user.phone_number,
            image_url: user.image_url,
            is_guest: false,
        }
    }
}

/// Réponse après login / guest-login: le profil + le JWT
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    #[serde(flatten)]
    pub user: UserProfile,
    pub token: String,
}

// ----------------------------------------------------------------------------
// User / profil
// ----------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub image_url: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateImageRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Image URL is required"))]
    pub image_url: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Token and new password are required"))]
    pub token: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Token and new password are required"))]
    pub password: String,
}

// ----------------------------------------------------------------------------
// Product
// ----------------------------------------------------------------------------

/// Le nom est stocké trimé: la longueur minimale porte sur la valeur trimée
fn validate_product_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().chars().count() < 2 {
        return Err(ValidationError::new("name_too_short"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddProductRequest {
    #[serde(rename = "userId", alias = "userID")]
    pub user_id: Option<String>,
    #[serde(default)]
    #[validate(custom(
        function = "validate_product_name",
        message = "Product name must be at least 2 characters long"
    ))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Manufacturer is required"))]
    pub manufacturer: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[validate(custom(function = "validate_amount", message = "Price must be between 0 and 1000000000000"))]
    pub price: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[serde(rename = "productID", alias = "productId", default)]
    #[validate(length(min = 1, message = "Product ID is required"))]
    pub product_id: String,
    #[serde(default)]
    #[validate(custom(
        function = "validate_product_name",
        message = "Product name must be at least 2 characters long"
    ))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Manufacturer is required"))]
    pub manufacturer: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[validate(custom(function = "validate_amount", message = "Price must be between 0 and 1000000000000"))]
    pub price: Option<Decimal>,
    #[serde(rename = "isActive")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SetStockRequest {
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(rename = "searchTerm")]
    pub search_term: Option<String>,
}

// ----------------------------------------------------------------------------
// Purchase / Sale
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct AddPurchaseRequest {
    #[serde(rename = "userID", alias = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "productID", alias = "productId", default)]
    #[validate(length(min = 1, message = "Product ID is required"))]
    pub product_id: String,
    #[serde(rename = "quantityPurchased", default)]
    #[validate(range(min = 1, message = "Valid quantity purchased is required"))]
    pub quantity_purchased: i32,
    #[serde(rename = "purchaseDate")]
    pub purchase_date: Option<String>,
    #[serde(rename = "totalPurchaseAmount")]
    #[validate(custom(function = "validate_amount", message = "Total purchase amount must be between 0 and 1000000000000"))]
    pub total_purchase_amount: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddSaleRequest {
    #[serde(rename = "userID", alias = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "productID", alias = "productId", default)]
    #[validate(length(min = 1, message = "Product ID is required"))]
    pub product_id: String,
    #[serde(rename = "storeID", alias = "storeId", default)]
    #[validate(length(min = 1, message = "Store ID is required"))]
    pub store_id: String,
    #[serde(rename = "stockSold", default)]
    #[validate(range(min = 1, message = "Valid stock sold quantity is required"))]
    pub stock_sold: i32,
    #[serde(rename = "saleDate")]
    pub sale_date: Option<String>,
    #[serde(rename = "totalSaleAmount")]
    #[validate(custom(function = "validate_amount", message = "Total sale amount must be between 0 and 1000000000000"))]
    pub total_sale_amount: Option<Decimal>,
}

/// Achat avec son produit inclus (comme un populate)
#[derive(Debug, Serialize)]
pub struct PurchaseView {
    #[serde(rename = "_id")]
    pub id: uuid::Uuid,
    #[serde(rename = "userID")]
    pub user_id: uuid::Uuid,
    #[serde(rename = "ProductID")]
    pub product: Option<product::Model>,
    #[serde(rename = "QuantityPurchased")]
    pub quantity_purchased: i32,
    #[serde(rename = "PurchaseDate")]
    pub purchase_date: chrono::NaiveDate,
    #[serde(rename = "TotalPurchaseAmount")]
    pub total_purchase_amount: Decimal,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl PurchaseView {
    pub fn new(purchase: purchase::Model, product: Option<product::Model>) -> Self {
        Self {
            id: purchase.id,
            user_id: purchase.user_id,
            product,
            quantity_purchased: purchase.quantity_purchased,
            purchase_date: purchase.purchase_date,
            total_purchase_amount: purchase.total_purchase_amount,
            created_at: purchase.created_at,
        }
    }
}

/// Vente avec son produit et son magasin inclus
#[derive(Debug, Serialize)]
pub struct SaleView {
    #[serde(rename = "_id")]
    pub id: uuid::Uuid,
    #[serde(rename = "userID")]
    pub user_id: uuid::Uuid,
    #[serde(rename = "ProductID")]
    pub product: Option<product::Model>,
    #[serde(rename = "StoreID")]
    pub store: Option<store::Model>,
    #[serde(rename = "StockSold")]
    pub stock_sold: i32,
    #[serde(rename = "SaleDate")]
    pub sale_date: chrono::NaiveDate,
    #[serde(rename = "TotalSaleAmount")]
    pub total_sale_amount: Decimal,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl SaleView {
    pub fn new(sale: sale::Model, product: Option<product::Model>, store: Option<store::Model>) -> Self {
        Self {
            id: sale.id,
            user_id: sale.user_id,
            product,
            store,
            stock_sold: sale.stock_sold,
            sale_date: sale.sale_date,
            total_sale_amount: sale.total_sale_amount,
            created_at: sale.created_at,
        }
    }
}

/// Réponse d'un achat/vente: la ligne créée + le stock résultant
#[derive(Debug, Serialize)]
pub struct MovementResponse<T: Serialize> {
    #[serde(flatten)]
    pub record: T,
    #[serde(rename = "productStock")]
    pub product_stock: i32,
}

#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    pub year: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalPurchaseAmountResponse {
    pub total_purchase_amount: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalSaleAmountResponse {
    pub total_sale_amount: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySalesResponse {
    pub sales_amount: Vec<Decimal>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPurchasesResponse {
    pub purchase_amount: Vec<Decimal>,
}

// ----------------------------------------------------------------------------
// Store
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct AddStoreRequest {
    #[serde(rename = "userId", alias = "userID")]
    pub user_id: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Store name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Store category is required"))]
    pub category: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Store address is required"))]
    pub address: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Store city is required"))]
    pub city: String,
    pub image: Option<String>,
}
