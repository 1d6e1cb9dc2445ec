//! The Anki collection schema (version 11) and the JSON blobs stored in its `col` row.
use serde_json::{Value, json};

use super::{Deck, Model};

/// Collection schema version.
pub const SCHEMA_VERSION: i64 = 11;

/// Collection creation time, in seconds.
pub const COLLECTION_CREATED: i64 = 1_411_124_400;

pub const SCHEMA: &str = r"
CREATE TABLE col (
    id              integer primary key,
    crt             integer not null,
    mod             integer not null,
    scm             integer not null,
    ver             integer not null,
    dty             integer not null,
    usn             integer not null,
    ls              integer not null,
    conf            text not null,
    models          text not null,
    decks           text not null,
    dconf           text not null,
    tags            text not null
);
CREATE TABLE notes (
    id              integer primary key,
    guid            text not null,
    mid             integer not null,
    mod             integer not null,
    usn             integer not null,
    tags            text not null,
    flds            text not null,
    sfld            integer not null,
    csum            integer not null,
    flags           integer not null,
    data            text not null
);
CREATE TABLE cards (
    id              integer primary key,
    nid             integer not null,
    did             integer not null,
    ord             integer not null,
    mod             integer not null,
    usn             integer not null,
    type            integer not null,
    queue           integer not null,
    due             integer not null,
    ivl             integer not null,
    factor          integer not null,
    reps            integer not null,
    lapses          integer not null,
    left            integer not null,
    odue            integer not null,
    odid            integer not null,
    flags           integer not null,
    data            text not null
);
CREATE TABLE revlog (
    id              integer primary key,
    cid             integer not null,
    usn             integer not null,
    ease            integer not null,
    ivl             integer not null,
    lastIvl         integer not null,
    factor          integer not null,
    time            integer not null,
    type            integer not null
);
CREATE TABLE graves (
    usn             integer not null,
    oid             integer not null,
    type            integer not null
);
CREATE INDEX ix_notes_usn on notes (usn);
CREATE INDEX ix_cards_usn on cards (usn);
CREATE INDEX ix_revlog_usn on revlog (usn);
CREATE INDEX ix_cards_nid on cards (nid);
CREATE INDEX ix_cards_sched on cards (did, queue, due);
CREATE INDEX ix_revlog_cid on revlog (cid);
CREATE INDEX ix_notes_csum on notes (csum);
";

pub const INSERT_COL: &str = "INSERT INTO col \
    (id, crt, mod, scm, ver, dty, usn, ls, conf, models, decks, dconf, tags) \
    VALUES (1, ?, ?, ?, ?, 0, 0, 0, ?, ?, ?, ?, '{}')";

pub const INSERT_NOTE: &str = "INSERT INTO notes \
    (id, guid, mid, mod, usn, tags, flds, sfld, csum, flags, data) \
    VALUES (?, ?, ?, ?, -1, ?, ?, ?, ?, 0, '')";

pub const INSERT_CARD: &str = "INSERT INTO cards \
    (id, nid, did, ord, mod, usn, type, queue, due, ivl, factor, reps, lapses, left, odue, odid, flags, data) \
    VALUES (?, ?, ?, ?, ?, -1, 0, 0, ?, 0, 0, 0, 0, 0, 0, 0, 0, '')";

/// Collection-wide settings.
pub fn conf(model: &Model) -> Value {
    json!({
        "activeDecks": [1],
        "addToCur": true,
        "collapseTime": 1200,
        "curDeck": 1,
        "curModel": model.id.to_string(),
        "dueCounts": true,
        "estTimes": true,
        "newBury": true,
        "newSpread": 0,
        "nextPos": 1,
        "sortBackwards": false,
        "sortType": "noteFld",
        "timeLim": 0,
    })
}

/// The note models, keyed by id.
pub fn models(model: &Model, deck: &Deck, modified: i64) -> Value {
    let fields: Vec<Value> = model
        .fields
        .iter()
        .enumerate()
        .map(|(ord, name)| {
            json!({
                "name": name,
                "ord": ord,
                "font": "Liberation Sans",
                "media": [],
                "rtl": false,
                "size": 20,
                "sticky": false,
            })
        })
        .collect();
    let templates: Vec<Value> = model
        .templates
        .iter()
        .enumerate()
        .map(|(ord, template)| {
            json!({
                "name": template.name,
                "ord": ord,
                "qfmt": template.qfmt,
                "afmt": template.afmt,
                "bqfmt": "",
                "bafmt": "",
                "did": null,
            })
        })
        .collect();
    let req: Vec<Value> = model
        .required_fields()
        .into_iter()
        .enumerate()
        .map(|(ord, fields)| json!([ord, "any", fields]))
        .collect();

    json!({
        model.id.to_string(): {
            "id": model.id.to_string(),
            "name": model.name,
            "type": 0,
            "mod": modified,
            "usn": -1,
            "sortf": 0,
            "did": deck.id,
            "tmpls": templates,
            "flds": fields,
            "css": model.css,
            "latexPre": "\\documentclass[12pt]{article}\n\\special{papersize=3in,5in}\n\\usepackage[utf8]{inputenc}\n\\usepackage{amssymb,amsmath}\n\\pagestyle{empty}\n\\setlength{\\parindent}{0in}\n\\begin{document}\n",
            "latexPost": "\\end{document}",
            "latexsvg": false,
            "req": req,
            "tags": [],
            "vers": [],
        }
    })
}

/// The default deck plus `deck`, keyed by id.
pub fn decks(deck: &Deck, modified: i64) -> Value {
    json!({
        "1": deck_json(1, "Default", 0),
        deck.id.to_string(): deck_json(deck.id, &deck.name, modified),
    })
}

fn deck_json(id: i64, name: &str, modified: i64) -> Value {
    json!({
        "id": id,
        "name": name,
        "desc": "",
        "mod": modified,
        "usn": -1,
        "collapsed": false,
        "browserCollapsed": false,
        "conf": 1,
        "dyn": 0,
        "extendNew": 0,
        "extendRev": 50,
        "lrnToday": [0, 0],
        "newToday": [0, 0],
        "revToday": [0, 0],
        "timeToday": [0, 0],
    })
}

/// The default deck options group.
pub fn dconf() -> Value {
    json!({
        "1": {
            "id": 1,
            "name": "Default",
            "mod": 0,
            "usn": 0,
            "autoplay": true,
            "replayq": true,
            "timer": 0,
            "maxTaken": 60,
            "dyn": false,
            "new": {
                "bury": true,
                "delays": [1.0, 10.0],
                "initialFactor": 2500,
                "ints": [1, 4, 7],
                "order": 1,
                "perDay": 20,
                "separate": true,
            },
            "lapse": {
                "delays": [10.0],
                "leechAction": 0,
                "leechFails": 8,
                "minInt": 1,
                "mult": 0.0,
            },
            "rev": {
                "bury": true,
                "ease4": 1.3,
                "fuzz": 0.05,
                "ivlFct": 1.0,
                "maxIvl": 36500,
                "minSpace": 1,
                "perDay": 100,
            },
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn models_are_keyed_by_id() {
        let model = Model::vocabulary(42, "NO-EN Basic");
        let deck = Deck::new(7, "Norsk");
        let models = models(&model, &deck, 100);

        assert_eq!(models["42"]["name"], "NO-EN Basic");
        assert_eq!(models["42"]["did"], 7);
        assert_eq!(models["42"]["flds"][2]["name"], "Extra");
        assert_eq!(models["42"]["tmpls"][0]["qfmt"], "{{Expression}}");
        assert_eq!(models["42"]["req"], json!([[0, "any", [0]]]));
    }

    #[test]
    fn decks_include_default() {
        let decks = decks(&Deck::new(7, "Norsk"), 100);

        assert_eq!(decks["1"]["name"], "Default");
        assert_eq!(decks["7"]["name"], "Norsk");
        assert_eq!(decks["7"]["mod"], 100);
    }
}
