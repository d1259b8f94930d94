use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250301_000000_bootstrap::{add_touch_trigger, drop_touch_trigger};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(CouponType::Enum)
                    .values([CouponType::Percentage, CouponType::Fixed])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Coupons::Table)
                    .if_not_exists()
                    .col(pk_uuid(Coupons::Id))
                    .col(string(Coupons::Code).unique_key())
                    .col(
                        ColumnDef::new(Coupons::Type)
                            .enumeration(
                                CouponType::Enum,
                                [CouponType::Percentage, CouponType::Fixed],
                            )
                            .not_null(),
                    )
                    .col(decimal_len(Coupons::Value, 12, 2))
                    .col(decimal_len_null(Coupons::MinAmount, 12, 2))
                    .col(decimal_len_null(Coupons::MaxDiscount, 12, 2))
                    .col(integer_null(Coupons::UsageLimit))
                    .col(integer(Coupons::UsedCount).default(0))
                    .col(timestamp_with_time_zone_null(Coupons::ExpiresAt))
                    .col(boolean(Coupons::IsActive).default(true))
                    .col(
                        timestamp_with_time_zone(Coupons::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Coupons::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::col(Coupons::UsedCount).gte(0))
                    .to_owned(),
            )
            .await?;

        add_touch_trigger(manager, "coupons").await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_touch_trigger(manager, "coupons").await?;

        manager
            .drop_table(Table::drop().table(Coupons::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(CouponType::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Coupons {
    Table,
    Id,
    Code,
    Type,
    Value,
    MinAmount,
    MaxDiscount,
    UsageLimit,
    UsedCount,
    ExpiresAt,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CouponType {
    #[sea_orm(iden = "coupon_type")]
    Enum,
    #[sea_orm(iden = "percentage")]
    Percentage,
    #[sea_orm(iden = "fixed")]
    Fixed,
}
