#![allow(dead_code)]

use std::{env, fs, process};

use database::{connection::establish_connection, models::ingredient::NewIngredient};
use diesel::{insert_into, PgConnection, QueryResult, RunQueryDsl};
use itertools::Itertools;
use serde_json::from_str;

mod database;

const DEFAULT_FILE: &str = "data/ingredients.json";
const CHUNK_SIZE: usize = 1000;

fn main() {
    let json_file = env::args().nth(1).unwrap_or_else(|| DEFAULT_FILE.to_owned());

    let ingredients = match read_ingredients(&json_file) {
        Ok(ingredients) => ingredients,
        Err(e) => {
            eprintln!("Can't load {json_file}: {e}");
            process::exit(1);
        }
    };

    let mut connection = establish_connection();

    let inserted = connection
        .build_transaction()
        .run(|connection| fill_ingredients(connection, &ingredients))
        .unwrap_or_else(|e| {
            eprintln!("Import failed, nothing was written: {e}");
            process::exit(1);
        });

    println!(
        "Imported {inserted} new ingredients, skipped {}",
        ingredients.len() - inserted
    );
}

fn read_ingredients(json_file: &str) -> Result<Vec<NewIngredient>, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(json_file)?;
    let ingredients: Vec<NewIngredient> = from_str(&content)?;

    // The file itself may repeat a (name, unit) pair
    Ok(ingredients
        .into_iter()
        .unique_by(|ingredient| (ingredient.name.clone(), ingredient.measurement_unit.clone()))
        .collect_vec())
}

fn fill_ingredients(
    connection: &mut PgConnection,
    ingredients: &[NewIngredient],
) -> QueryResult<usize> {
    use crate::database::schema::ingredients;

    println!("Starting fill_ingredients");

    let mut inserted = 0;
    for chunk in ingredients.chunks(CHUNK_SIZE) {
        inserted += insert_into(ingredients::table)
            .values(chunk)
            .on_conflict_do_nothing()
            .execute(connection)?;
    }

    println!("End fill_ingredients");

    Ok(inserted)
}
