use async_trait::async_trait;
use chrono::Utc;
use database::BaseRepository;
use domain_coupons::{CouponError, check_usable, discount_for};
use entity::{
    OrderStatus, PaymentStatus, addresses, cart_items, carts, coupons, order_items, orders,
    payments, product_variants, products, users,
};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{OrderError, OrderResult};
use crate::models::{CheckoutRequest, OrderQuery, OrderRecord, generate_order_number};
use crate::pricing::{PricedLine, Totals};
use crate::repository::OrderRepository;

pub struct PgOrderRepository {
    base: BaseRepository<orders::Entity>,
}

impl PgOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.base.db()
    }

    /// Attach items, buyer and payment to a page of orders.
    async fn load_records<C: ConnectionTrait>(
        conn: &C,
        orders: Vec<orders::Model>,
    ) -> OrderResult<Vec<OrderRecord>> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }
        let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let user_ids: Vec<Uuid> = orders.iter().map(|o| o.user_id).collect();

        let mut items_by_order: HashMap<Uuid, Vec<order_items::Model>> = HashMap::new();
        for item in order_items::Entity::find()
            .filter(order_items::Column::OrderId.is_in(order_ids.clone()))
            .order_by_asc(order_items::Column::CreatedAt)
            .all(conn)
            .await?
        {
            items_by_order.entry(item.order_id).or_default().push(item);
        }

        let buyers: HashMap<Uuid, users::Model> = users::Entity::find()
            .filter(users::Column::Id.is_in(user_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let mut payment_by_order: HashMap<Uuid, payments::Model> = payments::Entity::find()
            .filter(payments::Column::OrderId.is_in(order_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|p| (p.order_id, p))
            .collect();

        Ok(orders
            .into_iter()
            .map(|order| OrderRecord {
                items: items_by_order.remove(&order.id).unwrap_or_default(),
                user: buyers.get(&order.user_id).cloned(),
                payment: payment_by_order.remove(&order.id),
                order,
            })
            .collect())
    }

    async fn load_record<C: ConnectionTrait>(
        conn: &C,
        order: orders::Model,
    ) -> OrderResult<OrderRecord> {
        let id = order.id;
        Self::load_records(conn, vec![order])
            .await?
            .pop()
            .ok_or(OrderError::NotFound(id))
    }
}

/// `%term%` with the LIKE wildcards inside `term` matched literally
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Lower `stock` by `quantity` only while enough is left. Returns false when
/// a concurrent checkout took the stock first.
async fn take_stock<C: ConnectionTrait>(conn: &C, line: &PricedLine) -> OrderResult<bool> {
    let rows_affected = match line.variant_id {
        Some(variant_id) => {
            product_variants::Entity::update_many()
                .col_expr(
                    product_variants::Column::Stock,
                    Expr::cust_with_values(r#""stock" - $1"#, [line.quantity]),
                )
                .filter(product_variants::Column::Id.eq(variant_id))
                .filter(product_variants::Column::Stock.gte(line.quantity))
                .exec(conn)
                .await?
                .rows_affected
        }
        None => {
            products::Entity::update_many()
                .col_expr(
                    products::Column::Stock,
                    Expr::cust_with_values(r#""stock" - $1"#, [line.quantity]),
                )
                .filter(products::Column::Id.eq(line.product_id))
                .filter(products::Column::Stock.gte(line.quantity))
                .exec(conn)
                .await?
                .rows_affected
        }
    };
    Ok(rows_affected > 0)
}

async fn restore_stock<C: ConnectionTrait>(conn: &C, item: &order_items::Model) -> OrderResult<()> {
    match item.variant_id {
        Some(variant_id) => {
            product_variants::Entity::update_many()
                .col_expr(
                    product_variants::Column::Stock,
                    Expr::cust_with_values(r#""stock" + $1"#, [item.quantity]),
                )
                .filter(product_variants::Column::Id.eq(variant_id))
                .exec(conn)
                .await?;
        }
        None => {
            products::Entity::update_many()
                .col_expr(
                    products::Column::Stock,
                    Expr::cust_with_values(r#""stock" + $1"#, [item.quantity]),
                )
                .filter(products::Column::Id.eq(item.product_id))
                .exec(conn)
                .await?;
        }
    }
    Ok(())
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn checkout(&self, request: CheckoutRequest) -> OrderResult<OrderRecord> {
        let txn = self.db().begin().await?;
        let now = Utc::now();

        let cart = carts::Entity::find()
            .filter(carts::Column::UserId.eq(request.user_id))
            .filter(carts::Column::IsCheckedOut.eq(false))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(OrderError::CartEmpty)?;
        let cart_lines = cart_items::Entity::find()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .order_by_asc(cart_items::Column::CreatedAt)
            .all(&txn)
            .await?;
        if cart_lines.is_empty() {
            return Err(OrderError::CartEmpty);
        }

        let address = addresses::Entity::find_by_id(request.address_id)
            .filter(addresses::Column::UserId.eq(request.user_id))
            .one(&txn)
            .await?
            .ok_or(OrderError::AddressNotFound)?;

        let mut lines = Vec::with_capacity(cart_lines.len());
        for cart_line in &cart_lines {
            let product = products::Entity::find_by_id(cart_line.product_id)
                .one(&txn)
                .await?
                .filter(|p| p.is_active)
                .ok_or_else(|| OrderError::ProductUnavailable(cart_line.product_id.to_string()))?;
            let variant = match cart_line.variant_id {
                Some(variant_id) => Some(
                    product_variants::Entity::find_by_id(variant_id)
                        .one(&txn)
                        .await?
                        .ok_or_else(|| OrderError::ProductUnavailable(product.name.clone()))?,
                ),
                None => None,
            };
            lines.push(PricedLine::price(&product, variant.as_ref(), cart_line.quantity)?);
        }
        let sub_total = Totals::sub_total(&lines);

        let (discount, coupon_code) = match request.coupon_code.as_deref() {
            Some(code) => {
                let coupon = coupons::Entity::find()
                    .filter(coupons::Column::Code.eq(code))
                    .lock_exclusive()
                    .one(&txn)
                    .await?
                    .ok_or(CouponError::InvalidCode)?;
                check_usable(&coupon, sub_total, now)?;
                let discount = discount_for(&coupon, sub_total);

                let code = coupon.code.clone();
                let used_count = coupon.used_count;
                let mut active = coupon.into_active_model();
                active.used_count = Set(used_count + 1);
                active.updated_at = Set(now.into());
                active.update(&txn).await?;

                (discount, Some(code))
            }
            None => (Decimal::ZERO, None),
        };
        let totals = Totals::compute(sub_total, discount);

        let order = orders::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_number: Set(generate_order_number(now)),
            user_id: Set(request.user_id),
            status: Set(OrderStatus::Pending),
            sub_total: Set(totals.sub_total),
            tax_amount: Set(totals.tax_amount),
            shipping_cost: Set(totals.shipping_cost),
            discount_amount: Set(totals.discount_amount),
            total_amount: Set(totals.total_amount),
            coupon_code: Set(coupon_code),
            shipping_address: Set(address.snapshot()),
            note: Set(request.note),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            let item = order_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order.id),
                product_id: Set(line.product_id),
                variant_id: Set(line.variant_id),
                product_name: Set(line.product_name.clone()),
                quantity: Set(line.quantity),
                price: Set(line.price),
                created_at: Set(now.into()),
            }
            .insert(&txn)
            .await?;
            items.push(item);

            if !take_stock(&txn, line).await? {
                // Dropping `txn` rolls back everything above.
                tracing::warn!(product_id = %line.product_id, "Stock taken by a concurrent checkout");
                return Err(OrderError::InsufficientStock {
                    name: line.product_name.clone(),
                    available: 0,
                    requested: line.quantity,
                });
            }
        }

        let mut cart = cart.into_active_model();
        cart.is_checked_out = Set(true);
        cart.updated_at = Set(now.into());
        cart.update(&txn).await?;

        let payment = payments::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            user_id: Set(request.user_id),
            amount: Set(totals.total_amount),
            currency: Set(request.currency),
            status: Set(PaymentStatus::Pending),
            payment_method: Set(request.payment_method),
            transaction_id: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(
            order_id = %order.id,
            order_number = %order.order_number,
            total = %order.total_amount,
            "Checked out order"
        );

        let user = users::Entity::find_by_id(request.user_id).one(self.db()).await?;
        Ok(OrderRecord {
            order,
            items,
            user,
            payment: Some(payment),
        })
    }

    async fn find(&self, id: Uuid, user_id: Option<Uuid>) -> OrderResult<Option<OrderRecord>> {
        let mut query = orders::Entity::find_by_id(id);
        if let Some(user_id) = user_id {
            query = query.filter(orders::Column::UserId.eq(user_id));
        }
        match query.one(self.db()).await? {
            Some(order) => Ok(Some(Self::load_record(self.db(), order).await?)),
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        user_id: Option<Uuid>,
        query: OrderQuery,
    ) -> OrderResult<(Vec<OrderRecord>, u64)> {
        let mut select = orders::Entity::find();
        if let Some(user_id) = user_id {
            select = select.filter(orders::Column::UserId.eq(user_id));
        }
        if let Some(status) = query.status {
            select = select.filter(orders::Column::Status.eq(status));
        }
        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            select = select.filter(Expr::cust_with_values(
                r#""orders"."order_number" ILIKE $1"#,
                [contains_pattern(search)],
            ));
        }

        let offset = query
            .offset()
            .ok_or_else(|| OrderError::Validation("page is out of range".to_string()))?;

        let total = select.clone().count(self.db()).await?;
        let orders = select
            .order_by_desc(orders::Column::CreatedAt)
            .offset(offset)
            .limit(query.limit)
            .all(self.db())
            .await?;

        Ok((Self::load_records(self.db(), orders).await?, total))
    }

    async fn cancel(&self, id: Uuid, user_id: Uuid) -> OrderResult<OrderRecord> {
        let txn = self.db().begin().await?;
        let now = Utc::now();

        let order = orders::Entity::find_by_id(id)
            .filter(orders::Column::UserId.eq(user_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(OrderError::NotFound(id))?;
        if order.status != OrderStatus::Pending {
            return Err(OrderError::NotCancellable);
        }

        let items = order_items::Entity::find()
            .filter(order_items::Column::OrderId.eq(id))
            .all(&txn)
            .await?;
        for item in &items {
            restore_stock(&txn, item).await?;
        }

        if let Some(code) = order.coupon_code.as_deref() {
            coupons::Entity::update_many()
                .col_expr(
                    coupons::Column::UsedCount,
                    Expr::cust(r#""used_count" - 1"#),
                )
                .filter(coupons::Column::Code.eq(code))
                .filter(coupons::Column::UsedCount.gt(0))
                .exec(&txn)
                .await?;
        }

        if let Some(payment) = payments::Entity::find()
            .filter(payments::Column::OrderId.eq(id))
            .one(&txn)
            .await?
            .filter(|p| p.status == PaymentStatus::Pending)
        {
            let mut payment = payment.into_active_model();
            payment.status = Set(PaymentStatus::Failed);
            payment.updated_at = Set(now.into());
            payment.update(&txn).await?;
        }

        let mut active = order.into_active_model();
        active.status = Set(OrderStatus::Cancelled);
        active.updated_at = Set(now.into());
        let order = active.update(&txn).await?;

        let record = Self::load_record(&txn, order).await?;
        txn.commit().await?;

        tracing::info!(order_id = %id, restored_lines = items.len(), "Cancelled order");
        Ok(record)
    }

    async fn set_status(&self, id: Uuid, status: OrderStatus) -> OrderResult<OrderRecord> {
        let txn = self.db().begin().await?;

        // Serialised with `cancel` through the row lock
        let order = orders::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(OrderError::NotFound(id))?;
        if order.status.is_final() {
            tracing::warn!(order_id = %id, from = %order.status, to = %status, "Rejected status change");
            return Err(OrderError::FinalStatus(order.status));
        }

        let mut active = order.into_active_model();
        active.status = Set(status);
        active.updated_at = Set(Utc::now().into());
        let order = active.update(&txn).await?;

        let record = Self::load_record(&txn, order).await?;
        txn.commit().await?;

        tracing::info!(order_id = %id, status = %status, "Updated order status");
        Ok(record)
    }
}
