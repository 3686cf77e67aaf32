//! Wire-level properties of the request protocol: round-trip identity,
//! literal/raw-expression tagging and chain ordering in the serialized
//! tree. No transport involved.

use jserv_link::{
    Assignable, Body, Chainable, Envelope, FieldValue, Filterable, Header, InsertBody, Joinable,
    Operator, QueryBody, UpdateBody,
};

fn joined_query() -> QueryBody {
    QueryBody::new(Some("sys-sqlite"), "a_users", "u")
        .expr("userName", "uname")
        .unwrap()
        .expr("userId", "uid")
        .unwrap()
        .expr("r.roleId", "role")
        .unwrap()
        .j("a_roles", "r", "u.roleId = r.roleId")
        .where_eq("u.userId", "admin")
        .order_by("userName", true)
}

// =============================================================================
// Round-trip law
// =============================================================================

#[test]
fn test_query_tree_round_trip_is_identity() {
    let body = Body::from(joined_query());
    let json = serde_json::to_value(&body).unwrap();
    let back: Body = serde_json::from_value(json).unwrap();
    assert_eq!(back, body);
}

#[test]
fn test_envelope_round_trip_with_chained_children() {
    let update = UpdateBody::new(None, "a_users")
        .nv("nationId", "CN")
        .unwrap()
        .where_eq("userId", "admin")
        .post(
            jserv_link::DeleteBody::new(None, "a_attaches")
                .where_eq("busiTbl", "a_users")
                .post(
                    InsertBody::new(None, "a_attaches")
                        .cols(["attName", "busiId"])
                        .unwrap()
                        .nv("attName", "portrait")
                        .unwrap()
                        .nv("busiId", "admin")
                        .unwrap(),
                ),
        );

    let msg = Envelope::new(jserv_link::Port::Update, Body::from(update))
        .header(Header::new("001UsrSes", "admin").usr_act("tester", "a_users", "update", "round trip"))
        .with_seq(7);

    let json = serde_json::to_value(&msg).unwrap();
    let back: Envelope<Body> = serde_json::from_value(json).unwrap();
    assert_eq!(back, msg);
}

// =============================================================================
// Literal vs raw expression
// =============================================================================

#[test]
fn test_insert_serializes_raw_value_unquoted() {
    let insert = InsertBody::new(Some("orcl.alarm-report"), "b_reprecords")
        .cols(["deviceId", "val"])
        .unwrap()
        .valus(vec![
            ("deviceId", FieldValue::from("d001")),
            ("val", FieldValue::expr("42.0")),
        ])
        .unwrap();

    let json = serde_json::to_value(Body::from(insert)).unwrap();
    let row = &json["rows"][0];

    // deviceId stays a tagged string literal, val rides as a raw fragment.
    assert_eq!(row[0]["n"], "deviceId");
    assert_eq!(row[0]["v"]["t"], "str");
    assert_eq!(row[0]["v"]["v"], "d001");
    assert_eq!(row[1]["n"], "val");
    assert_eq!(row[1]["v"]["t"], "expr");
    assert_eq!(row[1]["v"]["v"], "42.0");
}

#[test]
fn test_rendering_honors_the_distinction() {
    assert_eq!(FieldValue::from("d001").to_sql_literal(), "'d001'");
    assert_eq!(FieldValue::expr("0").to_sql_literal(), "0");
}

#[test]
fn test_predicate_rhs_expression_survives_round_trip() {
    let q = QueryBody::new(Some("orcl.alarm-report"), "b_reports", "r")
        .j("b_reprecords", "rec", "r.repId = rec.repId")
        .where_cond(
            Operator::Gt,
            "decode(r.stamp, null, sysdate, r.stamp) - sysdate",
            FieldValue::expr("-0.1"),
        );

    let json = serde_json::to_value(Body::from(q)).unwrap();
    let back: Body = serde_json::from_value(json.clone()).unwrap();
    match &back {
        Body::Query(q) => assert!(q.conds[0].rhs.is_raw()),
        _ => panic!("expected a query body"),
    }
    assert_eq!(json["conds"][0]["rhs"]["t"], "expr");
}

// =============================================================================
// Chain ordering in the serialized tree
// =============================================================================

#[test]
fn test_children_serialize_in_attachment_order() {
    let parent = UpdateBody::new(None, "t_parent")
        .post(InsertBody::new(None, "t_a").cols(["c"]).unwrap())
        .post(InsertBody::new(None, "t_b").cols(["c"]).unwrap())
        .post(InsertBody::new(None, "t_c").cols(["c"]).unwrap());

    let json = serde_json::to_value(Body::from(parent)).unwrap();
    let tables: Vec<&str> = json["post"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["tabl"].as_str().unwrap())
        .collect();
    assert_eq!(tables, vec!["t_a", "t_b", "t_c"]);
}

#[test]
fn test_reordering_attachment_reorders_serialization() {
    let parent = UpdateBody::new(None, "t_parent")
        .post(InsertBody::new(None, "t_c").cols(["c"]).unwrap())
        .post(InsertBody::new(None, "t_a").cols(["c"]).unwrap());

    let json = serde_json::to_value(Body::from(parent)).unwrap();
    let tables: Vec<&str> = json["post"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["tabl"].as_str().unwrap())
        .collect();
    assert_eq!(tables, vec!["t_c", "t_a"]);
}

// =============================================================================
// Join ordering
// =============================================================================

#[test]
fn test_joins_serialize_left_to_right() {
    let q = QueryBody::new(None, "a_users", "u")
        .j("a_roles", "r", "u.roleId = r.roleId")
        .l("a_orgs", "o", "u.orgId = o.orgId");

    let json = serde_json::to_value(Body::from(q)).unwrap();
    assert_eq!(json["joins"][0]["tabl"], "a_roles");
    assert_eq!(json["joins"][0]["jt"], "j");
    assert_eq!(json["joins"][1]["tabl"], "a_orgs");
    assert_eq!(json["joins"][1]["jt"], "l");
}
