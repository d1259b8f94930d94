//! Checkout arithmetic, kept free of I/O.

use entity::{product_variants, products};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{OrderError, OrderResult};

/// A cart line priced at checkout time
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
}

impl PricedLine {
    /// Price a cart line from the current product and variant rows.
    ///
    /// The variant's price and stock apply when one is selected.
    pub fn price(
        product: &products::Model,
        variant: Option<&product_variants::Model>,
        quantity: i32,
    ) -> OrderResult<Self> {
        let (price, available) = match variant {
            Some(v) => (v.price, v.stock),
            None => (product.price, product.stock),
        };
        if quantity > available {
            return Err(OrderError::InsufficientStock {
                name: product.name.clone(),
                available,
                requested: quantity,
            });
        }

        Ok(Self {
            product_id: product.id,
            variant_id: variant.map(|v| v.id),
            product_name: product.name.clone(),
            quantity,
            price,
        })
    }

    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub sub_total: Decimal,
    pub tax_amount: Decimal,
    pub shipping_cost: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
}

impl Totals {
    pub fn sub_total(lines: &[PricedLine]) -> Decimal {
        lines.iter().map(PricedLine::subtotal).sum()
    }

    /// Tax and shipping are not charged; the total never goes negative.
    pub fn compute(sub_total: Decimal, discount: Decimal) -> Self {
        let tax_amount = Decimal::ZERO;
        let shipping_cost = Decimal::ZERO;
        let total_amount = (sub_total + tax_amount + shipping_cost - discount).max(Decimal::ZERO);
        Self {
            sub_total,
            tax_amount,
            shipping_cost,
            discount_amount: discount,
            total_amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn product(price: Decimal, stock: i32) -> products::Model {
        let now = Utc::now().into();
        products::Model {
            id: Uuid::new_v4(),
            name: "Kettle".to_string(),
            slug: "kettle".to_string(),
            description: None,
            price,
            compare_price: None,
            sku: "SKU-KETTLE".to_string(),
            stock,
            weight: None,
            brand: None,
            category_id: Uuid::new_v4(),
            is_active: true,
            expiry_date: None,
            warranty_months: None,
            dimensions: None,
            attributes: None,
            tags: serde_json::json!([]),
            created_at: now,
            updated_at: now,
        }
    }

    fn variant(product_id: Uuid, price: Decimal, stock: i32) -> product_variants::Model {
        let now = Utc::now().into();
        product_variants::Model {
            id: Uuid::new_v4(),
            product_id,
            name: "Steel".to_string(),
            sku: "SKU-KETTLE-S".to_string(),
            price,
            stock,
            attributes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_variant_price_and_stock_win() {
        let p = product(dec!(30), 0);
        let v = variant(p.id, dec!(35.50), 4);
        let line = PricedLine::price(&p, Some(&v), 2).unwrap();
        assert_eq!(line.price, dec!(35.50));
        assert_eq!(line.variant_id, Some(v.id));
        assert_eq!(line.subtotal(), dec!(71.00));
    }

    #[test]
    fn test_insufficient_stock_reports_counts() {
        let p = product(dec!(30), 1);
        let err = PricedLine::price(&p, None, 3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Kettle. Available: 1, requested: 3"
        );
    }

    #[test]
    fn test_totals() {
        let p = product(dec!(10.25), 10);
        let lines = vec![
            PricedLine::price(&p, None, 2).unwrap(),
            PricedLine::price(&p, None, 1).unwrap(),
        ];
        let sub_total = Totals::sub_total(&lines);
        assert_eq!(sub_total, dec!(30.75));

        let totals = Totals::compute(sub_total, dec!(5.75));
        assert_eq!(totals.total_amount, dec!(25.00));
        assert_eq!(totals.tax_amount, Decimal::ZERO);
        assert_eq!(totals.shipping_cost, Decimal::ZERO);
    }

    #[test]
    fn test_total_never_negative() {
        let totals = Totals::compute(dec!(5), dec!(8));
        assert_eq!(totals.total_amount, Decimal::ZERO);
    }
}
