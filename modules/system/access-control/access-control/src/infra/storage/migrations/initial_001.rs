use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let conn = manager.get_connection();

        let sql = match backend {
            sea_orm::DatabaseBackend::Postgres => {
                r#"
CREATE TABLE IF NOT EXISTS sys_user (
    id BIGSERIAL PRIMARY KEY,
    username VARCHAR(64) NOT NULL,
    nickname VARCHAR(64) NOT NULL,
    is_superuser BOOLEAN NOT NULL DEFAULT FALSE,
    is_staff BOOLEAN NOT NULL DEFAULT FALSE,
    status INTEGER NOT NULL DEFAULT 1
);
CREATE UNIQUE INDEX IF NOT EXISTS uk_sys_user_username ON sys_user(username);

CREATE TABLE IF NOT EXISTS sys_role (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(32) NOT NULL,
    status INTEGER NOT NULL DEFAULT 1,
    filters_scope BOOLEAN NOT NULL DEFAULT TRUE,
    remark TEXT
);
CREATE UNIQUE INDEX IF NOT EXISTS uk_sys_role_name ON sys_role(name);

CREATE TABLE IF NOT EXISTS sys_menu (
    id BIGSERIAL PRIMARY KEY,
    title VARCHAR(64) NOT NULL,
    name VARCHAR(64) NOT NULL,
    perms VARCHAR(255),
    status INTEGER NOT NULL DEFAULT 1,
    menu_type INTEGER NOT NULL DEFAULT 0,
    parent_id BIGINT,
    sort INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS sys_data_scope (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(64) NOT NULL,
    status INTEGER NOT NULL DEFAULT 1
);
CREATE UNIQUE INDEX IF NOT EXISTS uk_sys_data_scope_name ON sys_data_scope(name);

CREATE TABLE IF NOT EXISTS sys_data_rule (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    model VARCHAR(64) NOT NULL,
    "column" VARCHAR(32) NOT NULL,
    operator INTEGER NOT NULL,
    expression INTEGER NOT NULL,
    value VARCHAR(255) NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS uk_sys_data_rule_name ON sys_data_rule(name);

CREATE TABLE IF NOT EXISTS sys_dept (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(64) NOT NULL,
    sort INTEGER NOT NULL DEFAULT 0,
    leader VARCHAR(32),
    phone VARCHAR(11),
    email VARCHAR(64),
    status INTEGER NOT NULL DEFAULT 1,
    del_flag BOOLEAN NOT NULL DEFAULT FALSE,
    parent_id BIGINT,
    created_time TIMESTAMP NOT NULL,
    updated_time TIMESTAMP
);

CREATE TABLE IF NOT EXISTS sys_user_role (
    user_id BIGINT NOT NULL REFERENCES sys_user(id) ON DELETE CASCADE,
    role_id BIGINT NOT NULL REFERENCES sys_role(id) ON DELETE CASCADE,
    PRIMARY KEY (user_id, role_id)
);

CREATE TABLE IF NOT EXISTS sys_role_menu (
    role_id BIGINT NOT NULL REFERENCES sys_role(id) ON DELETE CASCADE,
    menu_id BIGINT NOT NULL REFERENCES sys_menu(id) ON DELETE CASCADE,
    PRIMARY KEY (role_id, menu_id)
);

CREATE TABLE IF NOT EXISTS sys_role_data_scope (
    role_id BIGINT NOT NULL REFERENCES sys_role(id) ON DELETE CASCADE,
    data_scope_id BIGINT NOT NULL REFERENCES sys_data_scope(id) ON DELETE CASCADE,
    PRIMARY KEY (role_id, data_scope_id)
);

CREATE TABLE IF NOT EXISTS sys_data_scope_rule (
    data_scope_id BIGINT NOT NULL REFERENCES sys_data_scope(id) ON DELETE CASCADE,
    data_rule_id BIGINT NOT NULL REFERENCES sys_data_rule(id) ON DELETE CASCADE,
    PRIMARY KEY (data_scope_id, data_rule_id)
);
                "#
            }
            sea_orm::DatabaseBackend::MySql => {
                r"
CREATE TABLE IF NOT EXISTS sys_user (
    id BIGINT AUTO_INCREMENT PRIMARY KEY,
    username VARCHAR(64) NOT NULL,
    nickname VARCHAR(64) NOT NULL,
    is_superuser BOOLEAN NOT NULL DEFAULT FALSE,
    is_staff BOOLEAN NOT NULL DEFAULT FALSE,
    status INT NOT NULL DEFAULT 1,
    UNIQUE KEY uk_sys_user_username (username)
);

CREATE TABLE IF NOT EXISTS sys_role (
    id BIGINT AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(32) NOT NULL,
    status INT NOT NULL DEFAULT 1,
    filters_scope BOOLEAN NOT NULL DEFAULT TRUE,
    remark TEXT,
    UNIQUE KEY uk_sys_role_name (name)
);

CREATE TABLE IF NOT EXISTS sys_menu (
    id BIGINT AUTO_INCREMENT PRIMARY KEY,
    title VARCHAR(64) NOT NULL,
    name VARCHAR(64) NOT NULL,
    perms VARCHAR(255),
    status INT NOT NULL DEFAULT 1,
    menu_type INT NOT NULL DEFAULT 0,
    parent_id BIGINT,
    sort INT NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS sys_data_scope (
    id BIGINT AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(64) NOT NULL,
    status INT NOT NULL DEFAULT 1,
    UNIQUE KEY uk_sys_data_scope_name (name)
);

CREATE TABLE IF NOT EXISTS sys_data_rule (
    id BIGINT AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    model VARCHAR(64) NOT NULL,
    `column` VARCHAR(32) NOT NULL,
    operator INT NOT NULL,
    expression INT NOT NULL,
    value VARCHAR(255) NOT NULL,
    UNIQUE KEY uk_sys_data_rule_name (name)
);

CREATE TABLE IF NOT EXISTS sys_dept (
    id BIGINT AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(64) NOT NULL,
    sort INT NOT NULL DEFAULT 0,
    leader VARCHAR(32),
    phone VARCHAR(11),
    email VARCHAR(64),
    status INT NOT NULL DEFAULT 1,
    del_flag BOOLEAN NOT NULL DEFAULT FALSE,
    parent_id BIGINT,
    created_time DATETIME NOT NULL,
    updated_time DATETIME
);

CREATE TABLE IF NOT EXISTS sys_user_role (
    user_id BIGINT NOT NULL,
    role_id BIGINT NOT NULL,
    PRIMARY KEY (user_id, role_id),
    CONSTRAINT fk_sys_user_role_user FOREIGN KEY (user_id) REFERENCES sys_user(id) ON DELETE CASCADE,
    CONSTRAINT fk_sys_user_role_role FOREIGN KEY (role_id) REFERENCES sys_role(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS sys_role_menu (
    role_id BIGINT NOT NULL,
    menu_id BIGINT NOT NULL,
    PRIMARY KEY (role_id, menu_id),
    CONSTRAINT fk_sys_role_menu_role FOREIGN KEY (role_id) REFERENCES sys_role(id) ON DELETE CASCADE,
    CONSTRAINT fk_sys_role_menu_menu FOREIGN KEY (menu_id) REFERENCES sys_menu(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS sys_role_data_scope (
    role_id BIGINT NOT NULL,
    data_scope_id BIGINT NOT NULL,
    PRIMARY KEY (role_id, data_scope_id),
    CONSTRAINT fk_sys_role_data_scope_role FOREIGN KEY (role_id) REFERENCES sys_role(id) ON DELETE CASCADE,
    CONSTRAINT fk_sys_role_data_scope_scope FOREIGN KEY (data_scope_id) REFERENCES sys_data_scope(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS sys_data_scope_rule (
    data_scope_id BIGINT NOT NULL,
    data_rule_id BIGINT NOT NULL,
    PRIMARY KEY (data_scope_id, data_rule_id),
    CONSTRAINT fk_sys_data_scope_rule_scope FOREIGN KEY (data_scope_id) REFERENCES sys_data_scope(id) ON DELETE CASCADE,
    CONSTRAINT fk_sys_data_scope_rule_rule FOREIGN KEY (data_rule_id) REFERENCES sys_data_rule(id) ON DELETE CASCADE
);
                "
            }
            sea_orm::DatabaseBackend::Sqlite => {
                r#"
CREATE TABLE IF NOT EXISTS sys_user (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    nickname TEXT NOT NULL,
    is_superuser BOOLEAN NOT NULL DEFAULT 0,
    is_staff BOOLEAN NOT NULL DEFAULT 0,
    status INTEGER NOT NULL DEFAULT 1
);
CREATE UNIQUE INDEX IF NOT EXISTS uk_sys_user_username ON sys_user(username);

CREATE TABLE IF NOT EXISTS sys_role (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    status INTEGER NOT NULL DEFAULT 1,
    filters_scope BOOLEAN NOT NULL DEFAULT 1,
    remark TEXT
);
CREATE UNIQUE INDEX IF NOT EXISTS uk_sys_role_name ON sys_role(name);

CREATE TABLE IF NOT EXISTS sys_menu (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    name TEXT NOT NULL,
    perms TEXT,
    status INTEGER NOT NULL DEFAULT 1,
    menu_type INTEGER NOT NULL DEFAULT 0,
    parent_id INTEGER,
    sort INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS sys_data_scope (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    status INTEGER NOT NULL DEFAULT 1
);
CREATE UNIQUE INDEX IF NOT EXISTS uk_sys_data_scope_name ON sys_data_scope(name);

CREATE TABLE IF NOT EXISTS sys_data_rule (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    model TEXT NOT NULL,
    "column" TEXT NOT NULL,
    operator INTEGER NOT NULL,
    expression INTEGER NOT NULL,
    value TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS uk_sys_data_rule_name ON sys_data_rule(name);

CREATE TABLE IF NOT EXISTS sys_dept (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    sort INTEGER NOT NULL DEFAULT 0,
    leader TEXT,
    phone TEXT,
    email TEXT,
    status INTEGER NOT NULL DEFAULT 1,
    del_flag BOOLEAN NOT NULL DEFAULT 0,
    parent_id INTEGER,
    created_time TEXT NOT NULL,
    updated_time TEXT
);

CREATE TABLE IF NOT EXISTS sys_user_role (
    user_id INTEGER NOT NULL,
    role_id INTEGER NOT NULL,
    PRIMARY KEY (user_id, role_id),
    FOREIGN KEY (user_id) REFERENCES sys_user(id) ON DELETE CASCADE,
    FOREIGN KEY (role_id) REFERENCES sys_role(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS sys_role_menu (
    role_id INTEGER NOT NULL,
    menu_id INTEGER NOT NULL,
    PRIMARY KEY (role_id, menu_id),
    FOREIGN KEY (role_id) REFERENCES sys_role(id) ON DELETE CASCADE,
    FOREIGN KEY (menu_id) REFERENCES sys_menu(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS sys_role_data_scope (
    role_id INTEGER NOT NULL,
    data_scope_id INTEGER NOT NULL,
    PRIMARY KEY (role_id, data_scope_id),
    FOREIGN KEY (role_id) REFERENCES sys_role(id) ON DELETE CASCADE,
    FOREIGN KEY (data_scope_id) REFERENCES sys_data_scope(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS sys_data_scope_rule (
    data_scope_id INTEGER NOT NULL,
    data_rule_id INTEGER NOT NULL,
    PRIMARY KEY (data_scope_id, data_rule_id),
    FOREIGN KEY (data_scope_id) REFERENCES sys_data_scope(id) ON DELETE CASCADE,
    FOREIGN KEY (data_rule_id) REFERENCES sys_data_rule(id) ON DELETE CASCADE
);
                "#
            }
        };

        conn.execute_unprepared(sql).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        let sql = r"
DROP TABLE IF EXISTS sys_data_scope_rule;
DROP TABLE IF EXISTS sys_role_data_scope;
DROP TABLE IF EXISTS sys_role_menu;
DROP TABLE IF EXISTS sys_user_role;
DROP TABLE IF EXISTS sys_dept;
DROP TABLE IF EXISTS sys_data_rule;
DROP TABLE IF EXISTS sys_data_scope;
DROP TABLE IF EXISTS sys_menu;
DROP TABLE IF EXISTS sys_role;
DROP TABLE IF EXISTS sys_user;
        ";

        conn.execute_unprepared(sql).await?;
        Ok(())
    }
}
