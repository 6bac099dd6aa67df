//! Schema registry: the static catalog of tables and their columns.
//!
//! A [`Schema`] is built once (from a built-in catalog or a TOML file) and
//! then passed by reference to the validator. It is never mutated afterwards.
//!
//! # File format
//!
//! ```toml
//! [[table]]
//! name = "cliente"
//! columns = ["idcliente", "nome", "email"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{RelalgError, RelalgResult};

/// A table and its ordered column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
}

impl Table {
    /// Check if the table declares a column.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// Ordered mapping from table name to column list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    tables: Vec<Table>,
}

#[derive(Deserialize)]
struct SchemaFile {
    #[serde(rename = "table", default)]
    tables: Vec<Table>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a schema table by table.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Add a table, rejecting duplicate table names and duplicate columns.
    pub fn with_table(mut self, name: &str, columns: &[&str]) -> RelalgResult<Self> {
        self.insert(Table {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        })?;
        Ok(self)
    }

    fn insert(&mut self, table: Table) -> RelalgResult<()> {
        if self.contains_table(&table.name) {
            return Err(RelalgError::schema(format!(
                "duplicate table '{}'",
                table.name
            )));
        }
        for (i, col) in table.columns.iter().enumerate() {
            if table.columns[..i].contains(col) {
                return Err(RelalgError::schema(format!(
                    "duplicate column '{}' in table '{}'",
                    col, table.name
                )));
            }
        }
        self.tables.push(table);
        Ok(())
    }

    /// The first built-in catalog: a small store with customers, products,
    /// orders, order items and suppliers.
    pub fn store() -> Self {
        Self::new()
            .builtin_table("cliente", &["idcliente", "nome", "email", "telefone", "endereco"])
            .builtin_table("produto", &["idproduto", "nomeproduto", "descricao", "preco", "estoque"])
            .builtin_table(
                "pedido",
                &["idpedido", "idcliente", "datapedido", "valortotalpedido", "status"],
            )
            .builtin_table(
                "itempedido",
                &["iditempedido", "idpedido", "idproduto", "quantidade", "precounitario"],
            )
            .builtin_table("fornecedor", &["idfornecedor", "nomefornecedor", "contato", "endereco"])
            .builtin_table("produtofornecedor", &["idproduto", "idfornecedor", "custo"])
    }

    /// The second built-in catalog: the same domain with surrogate `id` keys
    /// and `<table>_id` foreign keys.
    pub fn sales() -> Self {
        Self::new()
            .builtin_table("cliente", &["id", "nome", "email", "telefone"])
            .builtin_table("produto", &["id", "nome", "preco", "estoque"])
            .builtin_table(
                "pedido",
                &["id", "cliente_id", "data_pedido", "valor_total", "status"],
            )
            .builtin_table(
                "item_pedido",
                &["id", "pedido_id", "produto_id", "quantidade", "preco_unitario"],
            )
    }

    /// Resolve a built-in catalog by name.
    pub fn builtin(name: &str) -> RelalgResult<Self> {
        match name.to_lowercase().as_str() {
            "store" => Ok(Self::store()),
            "sales" => Ok(Self::sales()),
            other => Err(RelalgError::UnknownSchema(other.to_string())),
        }
    }

    // Built-in catalogs are checked by tests, so they skip the invariant checks.
    fn builtin_table(mut self, name: &str, columns: &[&str]) -> Self {
        self.tables.push(Table {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        });
        self
    }

    /// Parse a catalog from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, SchemaFileError> {
        let file: SchemaFile = toml::from_str(content)?;
        let mut schema = Self::new();
        for mut table in file.tables {
            table.name = table.name.to_lowercase();
            table.columns = table.columns.iter().map(|c| c.to_lowercase()).collect();
            schema.insert(table).map_err(SchemaFileError::Invalid)?;
        }
        Ok(schema)
    }

    /// Load a catalog from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> RelalgResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let schema = Self::from_toml_str(&content).map_err(|e| match e {
            SchemaFileError::Toml(source) => RelalgError::toml(path, source),
            SchemaFileError::Invalid(err) => err,
        })?;
        tracing::info!(
            "Loaded {} tables from {}",
            schema.tables.len(),
            path.display()
        );
        Ok(schema)
    }

    /// Look up a table by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Check if a table exists.
    pub fn contains_table(&self, name: &str) -> bool {
        self.table(name).is_some()
    }

    /// Get column names for a table.
    pub fn column_names(&self, table: &str) -> Option<&[String]> {
        self.table(table).map(|t| t.columns.as_slice())
    }

    /// All table names, in declaration order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Failure while decoding a schema document, before a file path is attached.
#[derive(Debug, Error)]
pub enum SchemaFileError {
    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(RelalgError),
}

/// Builder for [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    tables: Vec<Table>,
}

impl SchemaBuilder {
    /// Add a table.
    pub fn table(mut self, name: &str, columns: &[&str]) -> Self {
        self.tables.push(Table {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        });
        self
    }

    /// Build the schema, checking uniqueness of tables and columns.
    pub fn build(self) -> RelalgResult<Schema> {
        let mut schema = Schema::new();
        for table in self.tables {
            schema.insert(table)?;
        }
        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(schema: &Schema) {
        let rebuilt = schema
            .tables()
            .iter()
            .try_fold(Schema::new(), |acc, t| {
                let cols: Vec<&str> = t.columns.iter().map(String::as_str).collect();
                acc.with_table(&t.name, &cols)
            })
            .unwrap();
        assert_eq!(&rebuilt, schema);
    }

    #[test]
    fn test_builtin_catalogs_are_well_formed() {
        assert_well_formed(&Schema::store());
        assert_well_formed(&Schema::sales());
        assert_eq!(Schema::store().len(), 6);
        assert_eq!(Schema::sales().len(), 4);
    }

    #[test]
    fn test_builtin_lookup() {
        assert!(Schema::builtin("store").unwrap().contains_table("produtofornecedor"));
        assert!(Schema::builtin("SALES").unwrap().contains_table("item_pedido"));
        assert!(matches!(
            Schema::builtin("erp"),
            Err(RelalgError::UnknownSchema(ref s)) if s == "erp"
        ));
    }

    #[test]
    fn test_column_lookup() {
        let schema = Schema::store();
        let cliente = schema.table("cliente").unwrap();
        assert!(cliente.has_column("email"));
        assert!(!cliente.has_column("preco"));
        assert_eq!(schema.column_names("fornecedor").unwrap().len(), 4);
        assert!(schema.column_names("naotabela").is_none());
    }

    #[test]
    fn test_table_names_keep_declaration_order() {
        let schema = Schema::sales();
        let names: Vec<&str> = schema.table_names().collect();
        assert_eq!(names, vec!["cliente", "produto", "pedido", "item_pedido"]);
    }

    #[test]
    fn test_duplicate_table_rejected() {
        let err = Schema::builder()
            .table("a", &["x"])
            .table("a", &["y"])
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "Schema error: duplicate table 'a'");
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = Schema::new().with_table("a", &["x", "y", "x"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Schema error: duplicate column 'x' in table 'a'"
        );
    }

    #[test]
    fn test_from_toml() {
        let schema = Schema::from_toml_str(
            r#"
            [[table]]
            name = "Aluno"
            columns = ["matricula", "Nome"]

            [[table]]
            name = "curso"
            columns = ["codigo", "titulo"]
            "#,
        )
        .unwrap();
        assert_eq!(schema.len(), 2);
        assert!(schema.table("aluno").unwrap().has_column("nome"));
    }

    #[test]
    fn test_from_toml_duplicate() {
        let err = Schema::from_toml_str(
            r#"
            [[table]]
            name = "a"
            columns = ["x"]

            [[table]]
            name = "A"
            columns = ["y"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaFileError::Invalid(RelalgError::Schema(_))));
    }

    #[test]
    fn test_from_toml_syntax_error() {
        let err = Schema::from_toml_str("[[table]\nname = ").unwrap_err();
        assert!(matches!(err, SchemaFileError::Toml(_)));
    }
}
