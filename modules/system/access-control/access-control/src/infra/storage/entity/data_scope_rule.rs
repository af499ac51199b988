use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sys_data_scope_rule")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub data_scope_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub data_rule_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::data_scope::Entity",
        from = "Column::DataScopeId",
        to = "super::data_scope::Column::Id"
    )]
    DataScope,
    #[sea_orm(
        belongs_to = "super::data_rule::Entity",
        from = "Column::DataRuleId",
        to = "super::data_rule::Column::Id"
    )]
    DataRule,
}

impl ActiveModelBehavior for ActiveModel {}
