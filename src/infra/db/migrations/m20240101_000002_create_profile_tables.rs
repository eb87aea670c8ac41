//! Migration: Create farmer and customer profile tables.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FarmerProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FarmerProfiles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FarmerProfiles::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(FarmerProfiles::FarmName).string_len(255).not_null())
                    .col(ColumnDef::new(FarmerProfiles::FarmAddress).text().not_null())
                    .col(ColumnDef::new(FarmerProfiles::FarmDescription).text().null())
                    .col(ColumnDef::new(FarmerProfiles::Latitude).double().null())
                    .col(ColumnDef::new(FarmerProfiles::Longitude).double().null())
                    .col(
                        ColumnDef::new(FarmerProfiles::CertificationType)
                            .string_len(100)
                            .null(),
                    )
                    .col(ColumnDef::new(FarmerProfiles::YearsExperience).integer().null())
                    .col(
                        ColumnDef::new(FarmerProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(FarmerProfiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_farmer_profiles_user")
                            .from(FarmerProfiles::Table, FarmerProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CustomerProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CustomerProfiles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CustomerProfiles::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(CustomerProfiles::DeliveryAddress).text().null())
                    .col(
                        ColumnDef::new(CustomerProfiles::PreferredDeliveryTime)
                            .string_len(50)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CustomerProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CustomerProfiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_profiles_user")
                            .from(CustomerProfiles::Table, CustomerProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CustomerProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FarmerProfiles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FarmerProfiles {
    Table,
    Id,
    UserId,
    FarmName,
    FarmAddress,
    FarmDescription,
    Latitude,
    Longitude,
    CertificationType,
    YearsExperience,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CustomerProfiles {
    Table,
    Id,
    UserId,
    DeliveryAddress,
    PreferredDeliveryTime,
    CreatedAt,
    UpdatedAt,
}
