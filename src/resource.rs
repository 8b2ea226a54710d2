//! Resource paths and the closed set of metastore commands.
//!
//! Every command maps to a resource level (catalog, database, table) and an
//! operation (list, create). The parent path is always built from the same
//! `projects/{p}/locations/{l}[/catalogs/{c}[/databases/{d}]]` template, so a
//! deeper level's path extends its parent's path.

use serde_json::{Value, json};

/// Database type sent on every `database_create` call.
pub const DATABASE_TYPE: &str = "HIVE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceLevel {
    Catalog,
    Database,
    Table,
}

impl ResourceLevel {
    pub fn collection(self) -> &'static str {
        match self {
            ResourceLevel::Catalog => "catalogs",
            ResourceLevel::Database => "databases",
            ResourceLevel::Table => "tables",
        }
    }

    /// Query parameter naming the new resource on create. Tables have no
    /// create command, so they have none.
    pub fn id_param(self) -> Option<&'static str> {
        match self {
            ResourceLevel::Catalog => Some("catalogId"),
            ResourceLevel::Database => Some("databaseId"),
            ResourceLevel::Table => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Create => "create",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRef {
    pub project_id: String,
    pub location: String,
}

impl LocationRef {
    pub fn new(project_id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            location: location.into(),
        }
    }

    pub fn path(&self) -> String {
        format!("projects/{}/locations/{}", self.project_id, self.location)
    }

    pub fn catalog(&self, catalog: impl Into<String>) -> CatalogRef {
        CatalogRef {
            location: self.clone(),
            catalog: catalog.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRef {
    pub location: LocationRef,
    pub catalog: String,
}

impl CatalogRef {
    pub fn path(&self) -> String {
        format!("{}/catalogs/{}", self.location.path(), self.catalog)
    }

    pub fn database(&self, database: impl Into<String>) -> DatabaseRef {
        DatabaseRef {
            catalog: self.clone(),
            database: database.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseRef {
    pub catalog: CatalogRef,
    pub database: String,
}

impl DatabaseRef {
    pub fn path(&self) -> String {
        format!("{}/databases/{}", self.catalog.path(), self.database)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetastoreCommand {
    CatalogList { parent: LocationRef },
    CatalogCreate { parent: LocationRef, catalog: String },
    DatabaseList { parent: CatalogRef },
    DatabaseCreate { parent: CatalogRef, database: String },
    TableList { parent: DatabaseRef },
}

impl MetastoreCommand {
    /// Command name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            MetastoreCommand::CatalogList { .. } => "catalog_list",
            MetastoreCommand::CatalogCreate { .. } => "catalog_create",
            MetastoreCommand::DatabaseList { .. } => "database_list",
            MetastoreCommand::DatabaseCreate { .. } => "database_create",
            MetastoreCommand::TableList { .. } => "table_list",
        }
    }

    pub fn level(&self) -> ResourceLevel {
        match self {
            MetastoreCommand::CatalogList { .. } | MetastoreCommand::CatalogCreate { .. } => {
                ResourceLevel::Catalog
            }
            MetastoreCommand::DatabaseList { .. } | MetastoreCommand::DatabaseCreate { .. } => {
                ResourceLevel::Database
            }
            MetastoreCommand::TableList { .. } => ResourceLevel::Table,
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            MetastoreCommand::CatalogCreate { .. } | MetastoreCommand::DatabaseCreate { .. } => {
                Operation::Create
            }
            _ => Operation::List,
        }
    }

    pub fn parent_path(&self) -> String {
        match self {
            MetastoreCommand::CatalogList { parent }
            | MetastoreCommand::CatalogCreate { parent, .. } => parent.path(),
            MetastoreCommand::DatabaseList { parent }
            | MetastoreCommand::DatabaseCreate { parent, .. } => parent.path(),
            MetastoreCommand::TableList { parent } => parent.path(),
        }
    }

    /// Identifier of the resource being created, `None` for list commands.
    pub fn resource_id(&self) -> Option<&str> {
        match self {
            MetastoreCommand::CatalogCreate { catalog, .. } => Some(catalog.as_str()),
            MetastoreCommand::DatabaseCreate { database, .. } => Some(database.as_str()),
            _ => None,
        }
    }

    pub fn request_body(&self) -> Option<Value> {
        match self {
            MetastoreCommand::CatalogCreate { .. } => Some(json!({})),
            // TODO: confirm whether HIVE databases also need hiveOptions.locationUri.
            MetastoreCommand::DatabaseCreate { .. } => Some(json!({ "type": DATABASE_TYPE })),
            _ => None,
        }
    }
}
