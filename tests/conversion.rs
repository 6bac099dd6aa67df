use pretty_assertions::assert_eq;
use relalg::prelude::*;

fn store() -> Engine {
    Engine::new(Schema::store())
}

fn sales() -> Engine {
    Engine::new(Schema::sales())
}

#[test]
fn test_projection_of_single_table() {
    assert_eq!(
        store().convert("select nome, email from cliente").unwrap(),
        "π[nome, email](cliente)"
    );
}

#[test]
fn test_join_with_where_on_second_schema() {
    assert_eq!(
        sales()
            .convert(
                "select id from pedido join cliente on pedido.cliente_id=cliente.id where valor_total > 100"
            )
            .unwrap(),
        "π[id](σ[valor_total > 100]((pedido ⋈[pedido.cliente_id=cliente.id] cliente)))"
    );
}

#[test]
fn test_unknown_table() {
    let errors = store().convert("select x from naotabela").unwrap_err();
    assert_eq!(
        errors,
        vec![ValidationError::UnknownTable {
            table: "naotabela".to_string()
        }]
    );
}

#[test]
fn test_unknown_column() {
    let errors = store().convert("select colunainvalida from cliente").unwrap_err();
    assert_eq!(
        errors,
        vec![ValidationError::UnknownColumn {
            column: "colunainvalida".to_string(),
            searched: vec!["cliente".to_string()],
        }]
    );
    assert!(errors[0].to_string().contains("(cliente)"));
}

#[test]
fn test_missing_from() {
    for query in ["select nome", "SELECT nome, email", "nome from cliente", ""] {
        let errors = store().convert(query).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MissingSelectFrom], "{query}");
    }
}

#[test]
fn test_join_order_preserved() {
    let engine = Engine::new(
        Schema::builder()
            .table("a", &["x", "w"])
            .table("b", &["y"])
            .table("c", &["z"])
            .build()
            .unwrap(),
    );
    assert_eq!(
        engine.convert("SELECT w FROM A JOIN B ON A.x=B.y JOIN C").unwrap(),
        "π[w](((a ⋈[a.x=b.y] b) × c))"
    );
}

#[test]
fn test_table_errors_suppress_column_errors() {
    let errors = store()
        .convert("select nada, zero from cliente join fantasma join outrafantasma")
        .unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.kind() == ErrorKind::UnknownTable));
}

#[test]
fn test_cross_table_ambiguity_accepted() {
    // idcliente exists in both cliente and pedido
    assert!(store()
        .convert("select idcliente, status from pedido join cliente on pedido.idcliente = cliente.idcliente")
        .is_ok());
}

#[test]
fn test_evaluation_is_repeatable() {
    let engine = sales();
    for query in [
        "select nome from cliente join pedido where status = 'pago' order by nome",
        "select x, y from pedido",
        "select from",
    ] {
        assert_eq!(engine.evaluate(query), engine.evaluate(query));
    }
}

#[test]
fn test_wildcard_with_selection() {
    assert_eq!(
        store().convert("select * from produto where preco < 10").unwrap(),
        "π[*](σ[preco < 10](produto))"
    );
}

#[test]
fn test_join_without_base_table_identifier() {
    // The FROM target is not an identifier, so only the joined table is checked
    assert_eq!(
        store().convert("select nome from (x) join cliente").unwrap(),
        "π[nome](( × cliente))"
    );
}
