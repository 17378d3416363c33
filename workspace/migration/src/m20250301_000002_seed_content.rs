use chrono::Utc;
use model::entities::{feature, guideline, notification, parking_slot};
use sea_orm::{ActiveValue::Set, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use sea_orm_migration::prelude::*;

/// Locations and slot numbers created for a fresh installation.
const SEED_LOCATIONS: [&str; 3] = ["mall", "office", "hospital"];
const SEED_SLOTS_PER_LOCATION: i32 = 10;

const NOTIFICATIONS: [(&str, &str, notification::NotificationKind); 4] = [
    (
        "Welcome to Parking Management System",
        "Thank you for registering with our parking management system. Enjoy hassle-free parking!",
        notification::NotificationKind::Success,
    ),
    (
        "New Feature Available",
        "We have introduced online payment options for your convenience.",
        notification::NotificationKind::Info,
    ),
    (
        "Maintenance Notice",
        "Parking slots 5-8 will be under maintenance on Sunday. Please plan accordingly.",
        notification::NotificationKind::Warning,
    ),
    (
        "Holiday Schedule",
        "Parking rates will be revised during upcoming holidays. Check our pricing page for details.",
        notification::NotificationKind::Info,
    ),
];

const FEATURES: [(&str, &str, &str); 6] = [
    ("Easy Booking", "Book your parking slot in just a few clicks with our user-friendly interface.", "🚗"),
    ("Real-time Availability", "Check slot availability in real-time and avoid waiting in queues.", "⏰"),
    ("Secure Payments", "Multiple payment options with secure transaction processing.", "💳"),
    ("24/7 Support", "Round-the-clock customer support for all your parking needs.", "📞"),
    ("Mobile App", "Access parking services on the go with our mobile application.", "📱"),
    ("Digital Receipts", "Get digital receipts instantly after payment completion.", "🧾"),
];

const GUIDELINES: [(&str, &str, &str); 4] = [
    (
        "General Parking Rules",
        "1. Park only in designated slots\n2. Follow traffic rules\n3. Keep your vehicle locked\n4. Do not block other vehicles",
        "general",
    ),
    (
        "Payment Guidelines",
        "1. Payment must be completed before parking\n2. Keep payment receipt for verification\n3. Multiple payment methods accepted\n4. Refunds processed within 24 hours",
        "payment",
    ),
    (
        "Safety Guidelines",
        "1. Do not leave valuables in your vehicle\n2. Report any suspicious activity\n3. Follow emergency exit signs\n4. Keep emergency contacts handy",
        "safety",
    ),
    (
        "Vehicle Guidelines",
        "1. Ensure your vehicle is in good condition\n2. Follow size restrictions for slots\n3. Do not park oversized vehicles in regular slots\n4. Report any vehicle damage immediately",
        "vehicle",
    ),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let now = Utc::now();

        // Content is only seeded into an empty installation
        if notification::Entity::find().count(db).await? == 0 {
            notification::Entity::insert_many(NOTIFICATIONS.iter().map(|(title, message, kind)| {
                notification::ActiveModel {
                    title: Set(String::from(*title)),
                    message: Set(String::from(*message)),
                    kind: Set(*kind),
                    is_active: Set(true),
                    created_at: Set(now),
                    ..Default::default()
                }
            }))
            .exec(db)
            .await?;

            feature::Entity::insert_many(FEATURES.iter().map(|(title, description, icon)| {
                feature::ActiveModel {
                    title: Set(String::from(*title)),
                    description: Set(String::from(*description)),
                    icon: Set(Some(String::from(*icon))),
                    is_active: Set(true),
                    created_at: Set(now),
                    ..Default::default()
                }
            }))
            .exec(db)
            .await?;

            guideline::Entity::insert_many(GUIDELINES.iter().map(|(title, content, category)| {
                guideline::ActiveModel {
                    title: Set(String::from(*title)),
                    content: Set(String::from(*content)),
                    category: Set(Some(String::from(*category))),
                    is_active: Set(true),
                    created_at: Set(now),
                    ..Default::default()
                }
            }))
            .exec(db)
            .await?;
        }

        if parking_slot::Entity::find().count(db).await? == 0 {
            let slots = SEED_LOCATIONS.iter().flat_map(|location| {
                (1..=SEED_SLOTS_PER_LOCATION).map(move |slot_number| parking_slot::ActiveModel {
                    location: Set(String::from(*location)),
                    slot_number: Set(slot_number),
                    status: Set(parking_slot::SlotStatus::Available),
                    user_id: Set(None),
                    updated_at: Set(now),
                    ..Default::default()
                })
            });
            parking_slot::Entity::insert_many(slots).exec(db).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // Booked slots are left alone
        parking_slot::Entity::delete_many()
            .filter(parking_slot::Column::Location.is_in(SEED_LOCATIONS))
            .filter(parking_slot::Column::SlotNumber.between(1, SEED_SLOTS_PER_LOCATION))
            .filter(parking_slot::Column::Status.eq(parking_slot::SlotStatus::Available))
            .exec(db)
            .await?;

        notification::Entity::delete_many()
            .filter(notification::Column::Title.is_in(NOTIFICATIONS.iter().map(|(title, _, _)| *title)))
            .exec(db)
            .await?;
        feature::Entity::delete_many()
            .filter(feature::Column::Title.is_in(FEATURES.iter().map(|(title, _, _)| *title)))
            .exec(db)
            .await?;
        guideline::Entity::delete_many()
            .filter(guideline::Column::Title.is_in(GUIDELINES.iter().map(|(title, _, _)| *title)))
            .exec(db)
            .await?;

        Ok(())
    }
}
