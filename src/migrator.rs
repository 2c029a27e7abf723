use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_profile_tables::Migration),
            Box::new(m20240101_000003_create_products_table::Migration),
            Box::new(m20240101_000004_create_stock_log_tables::Migration),
        ]
    }
}

mod m20240101_000001_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Users::Name).string().not_null())
                        .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(
                            ColumnDef::new(Users::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Users::CreatedAt).timestamp_with_time_zone().not_null())
                        .col(ColumnDef::new(Users::UpdatedAt).timestamp_with_time_zone().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Users {
        Table,
        Id,
        Name,
        Email,
        PasswordHash,
        Active,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_profile_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_profile_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ShopProfiles::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ShopProfiles::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ShopProfiles::OwnerId)
                                .uuid()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(ShopProfiles::ShopName).string().not_null())
                        .col(ColumnDef::new(ShopProfiles::ContactNumber).string().null())
                        .col(ColumnDef::new(ShopProfiles::Address).string().null())
                        .col(
                            ColumnDef::new(ShopProfiles::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ShopProfiles::UpdatedAt).timestamp_with_time_zone().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Units::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Units::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Units::OwnerId).uuid().not_null())
                        .col(ColumnDef::new(Units::Name).string().not_null())
                        .col(ColumnDef::new(Units::Abbreviation).string().null())
                        .col(ColumnDef::new(Units::CreatedAt).timestamp_with_time_zone().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_units_owner_id")
                        .table(Units::Table)
                        .col(Units::OwnerId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Employees::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Employees::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Employees::OwnerId).uuid().not_null())
                        .col(ColumnDef::new(Employees::Name).string().not_null())
                        .col(ColumnDef::new(Employees::CreatedAt).timestamp_with_time_zone().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_employees_owner_id")
                        .table(Employees::Table)
                        .col(Employees::OwnerId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Employees::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Units::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ShopProfiles::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum ShopProfiles {
        Table,
        Id,
        OwnerId,
        ShopName,
        ContactNumber,
        Address,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum Units {
        Table,
        Id,
        OwnerId,
        Name,
        Abbreviation,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum Employees {
        Table,
        Id,
        OwnerId,
        Name,
        CreatedAt,
    }
}

mod m20240101_000003_create_products_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_products_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Products::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Products::OwnerId).uuid().not_null())
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(ColumnDef::new(Products::Sku).string().not_null())
                        .col(ColumnDef::new(Products::Category).string().not_null())
                        .col(
                            ColumnDef::new(Products::StockQuantity)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Products::UnitId).uuid().not_null())
                        .col(ColumnDef::new(Products::UnitName).string().not_null())
                        .col(ColumnDef::new(Products::UnitAbbreviation).string().null())
                        .col(
                            ColumnDef::new(Products::PiecesPerUnit)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(Products::Price)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Products::Status).string().not_null())
                        .col(
                            ColumnDef::new(Products::LowStockThreshold)
                                .decimal()
                                .null(),
                        )
                        .col(ColumnDef::new(Products::ImageUrl).string().null())
                        .col(ColumnDef::new(Products::CreatedAt).timestamp_with_time_zone().not_null())
                        .col(ColumnDef::new(Products::UpdatedAt).timestamp_with_time_zone().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_products_owner_id")
                        .table(Products::Table)
                        .col(Products::OwnerId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_products_owner_sku")
                        .table(Products::Table)
                        .col(Products::OwnerId)
                        .col(Products::Sku)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Products {
        Table,
        Id,
        OwnerId,
        Name,
        Sku,
        Category,
        StockQuantity,
        UnitId,
        UnitName,
        UnitAbbreviation,
        PiecesPerUnit,
        Price,
        Status,
        LowStockThreshold,
        ImageUrl,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000004_create_stock_log_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_stock_log_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(IncomingStockLogs::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(IncomingStockLogs::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(IncomingStockLogs::OwnerId).uuid().not_null())
                        .col(
                            ColumnDef::new(IncomingStockLogs::ProductId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(IncomingStockLogs::ProductName)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(IncomingStockLogs::Sku).string().null())
                        .col(
                            ColumnDef::new(IncomingStockLogs::QuantityAdded)
                                .decimal()
                                .not_null(),
                        )
                        .col(ColumnDef::new(IncomingStockLogs::UnitId).uuid().not_null())
                        .col(
                            ColumnDef::new(IncomingStockLogs::UnitName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(IncomingStockLogs::UnitAbbreviation)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(IncomingStockLogs::ArrivalDate)
                                .date()
                                .not_null(),
                        )
                        .col(ColumnDef::new(IncomingStockLogs::PoNumber).string().null())
                        .col(ColumnDef::new(IncomingStockLogs::Supplier).string().null())
                        .col(
                            ColumnDef::new(IncomingStockLogs::LoggedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_incoming_logs_owner_id")
                        .table(IncomingStockLogs::Table)
                        .col(IncomingStockLogs::OwnerId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_incoming_logs_product_id")
                        .table(IncomingStockLogs::Table)
                        .col(IncomingStockLogs::ProductId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(OutgoingStockLogs::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OutgoingStockLogs::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OutgoingStockLogs::OwnerId).uuid().not_null())
                        .col(
                            ColumnDef::new(OutgoingStockLogs::ProductId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OutgoingStockLogs::ProductName)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OutgoingStockLogs::Sku).string().null())
                        .col(
                            ColumnDef::new(OutgoingStockLogs::QuantityRemoved)
                                .decimal()
                                .not_null(),
                        )
                        // Unit id is a string: the product's unit id, or the
                        // canonical "pcs" when issued by piece
                        .col(
                            ColumnDef::new(OutgoingStockLogs::UnitId)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OutgoingStockLogs::UnitName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OutgoingStockLogs::UnitAbbreviation)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(OutgoingStockLogs::Destination)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(OutgoingStockLogs::Reason).string().null())
                        .col(
                            ColumnDef::new(OutgoingStockLogs::GatePassId)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OutgoingStockLogs::IssuedTo)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OutgoingStockLogs::DispatchDate)
                                .date()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OutgoingStockLogs::LoggedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_outgoing_logs_owner_id")
                        .table(OutgoingStockLogs::Table)
                        .col(OutgoingStockLogs::OwnerId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_outgoing_logs_gate_pass_id")
                        .table(OutgoingStockLogs::Table)
                        .col(OutgoingStockLogs::GatePassId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_outgoing_logs_product_id")
                        .table(OutgoingStockLogs::Table)
                        .col(OutgoingStockLogs::ProductId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OutgoingStockLogs::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(IncomingStockLogs::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum IncomingStockLogs {
        Table,
        Id,
        OwnerId,
        ProductId,
        ProductName,
        Sku,
        QuantityAdded,
        UnitId,
        UnitName,
        UnitAbbreviation,
        ArrivalDate,
        PoNumber,
        Supplier,
        LoggedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum OutgoingStockLogs {
        Table,
        Id,
        OwnerId,
        ProductId,
        ProductName,
        Sku,
        QuantityRemoved,
        UnitId,
        UnitName,
        UnitAbbreviation,
        Destination,
        Reason,
        GatePassId,
        IssuedTo,
        DispatchDate,
        LoggedAt,
    }
}
