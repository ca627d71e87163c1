use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "comparisons")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    pub winner_id: Uuid,
    pub loser_id: Uuid,
    pub sequence: i64,
    #[sea_orm(column_type = "Double")]
    pub winner_rating_before: f64,
    #[sea_orm(column_type = "Double")]
    pub loser_rating_before: f64,
    #[sea_orm(column_type = "Double")]
    pub winner_delta: f64,
    #[sea_orm(column_type = "Double")]
    pub loser_delta: f64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Project,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
