use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::SubjectId).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Username).string_len(50).not_null().unique_key())
                    .col(ColumnDef::new(Users::PrettyUsername).string_len(50).not_null().unique_key())
                    .col(ColumnDef::new(Users::FirstName).string_len(50).not_null().default(""))
                    .col(ColumnDef::new(Users::LastName).string_len(50).not_null().default(""))
                    .col(ColumnDef::new(Users::Email).string().not_null().default(""))
                    .col(ColumnDef::new(Users::IsSuperuser).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::IsStaff).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::IsActive).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::DateJoined).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create groups table
        manager
            .create_table(
                Table::create()
                    .table(Groups::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Groups::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Groups::Name).string_len(150).not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        // Create user_groups join table
        manager
            .create_table(
                Table::create()
                    .table(UserGroups::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserGroups::UserId).string().not_null())
                    .col(ColumnDef::new(UserGroups::GroupId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(UserGroups::UserId)
                            .col(UserGroups::GroupId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_groups_user_id")
                            .from(UserGroups::Table, UserGroups::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_groups_group_id")
                            .from(UserGroups::Table, UserGroups::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_groups_group_id")
                    .table(UserGroups::Table)
                    .col(UserGroups::GroupId)
                    .to_owned(),
            )
            .await?;

        // Create group_extensions table (one-to-one with groups)
        manager
            .create_table(
                Table::create()
                    .table(GroupExtensions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GroupExtensions::GroupId).integer().not_null().primary_key())
                    .col(ColumnDef::new(GroupExtensions::Description).string_len(50).not_null().default(""))
                    .col(ColumnDef::new(GroupExtensions::IsSuperuser).boolean().not_null().default(false))
                    .col(ColumnDef::new(GroupExtensions::IsStaff).boolean().not_null().default(false))
                    .col(ColumnDef::new(GroupExtensions::IsActive).boolean().not_null().default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_extensions_group_id")
                            .from(GroupExtensions::Table, GroupExtensions::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        // Create user_profiles table (one-to-one with users)
        manager
            .create_table(
                Table::create()
                    .table(UserProfiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserProfiles::UserId).string().not_null().primary_key())
                    .col(ColumnDef::new(UserProfiles::BirthDate).date().null())
                    .col(ColumnDef::new(UserProfiles::Gender).string_len(50).null())
                    .col(ColumnDef::new(UserProfiles::Country).string_len(50).null())
                    .col(ColumnDef::new(UserProfiles::PostalCode).string_len(10).null())
                    .col(ColumnDef::new(UserProfiles::StreetAddress).string_len(100).null())
                    .col(ColumnDef::new(UserProfiles::PhoneNumber).string_len(20).null())
                    .col(ColumnDef::new(UserProfiles::MembershipYears).string_len(500).null())
                    .col(ColumnDef::new(UserProfiles::IsMember).boolean().not_null().default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_profiles_user_id")
                            .from(UserProfiles::Table, UserProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GroupExtensions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserGroups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Groups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    SubjectId,
    Username,
    PrettyUsername,
    FirstName,
    LastName,
    Email,
    IsSuperuser,
    IsStaff,
    IsActive,
    DateJoined,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Groups {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum UserGroups {
    Table,
    UserId,
    GroupId,
}

#[derive(DeriveIden)]
enum GroupExtensions {
    Table,
    GroupId,
    Description,
    IsSuperuser,
    IsStaff,
    IsActive,
}

#[derive(DeriveIden)]
enum UserProfiles {
    Table,
    UserId,
    BirthDate,
    Gender,
    Country,
    PostalCode,
    StreetAddress,
    PhoneNumber,
    MembershipYears,
    IsMember,
}
