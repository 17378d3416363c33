use sea_orm::entity::prelude::*;

/// A registered customer who books slots and pays for them.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 PHC string. The raw password is never stored.
    pub password_hash: String,
    pub phone: Option<String>,
    /// Reference to an avatar image kept outside the database.
    pub profile_picture: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Slots currently held by this user.
    #[sea_orm(has_many = "super::parking_slot::Entity")]
    ParkingSlot,
    #[sea_orm(has_many = "super::payment::Entity")]
    Payment,
}

impl Related<super::parking_slot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParkingSlot.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
