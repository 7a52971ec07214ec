//! JSON set expressions.
//!
//! A document is either a bare expression or `{ "defs": [...], "set": ... }`,
//! where each def binds a name that later expressions reuse via
//! `{"type": "ref", "name": ...}`. Reused names share one node, so the result
//! is an operand DAG rather than a tree.
//!
//! Matrices are row-major (`[[m00, m01], [m10, m11]]`); zonotope generators
//! are listed one generator per entry.

use std::collections::HashMap;

use anyhow::{anyhow, bail, Context, Result};
use lazysets::api::{
    Ball1, Ball2, BallInf, CachedMinkowskiSumArray, CartesianProductArray, ConvexHullArray,
    ExponentialMap, HalfSpace, Hyperplane, Hyperrectangle, Intersection, IntoShared, LinearMap,
    MinkowskiSum, MinkowskiSumArray, SetRef, Singleton, VPolytope, Zonotope,
};
use nalgebra::{DMatrix, DVector};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SetExpr {
    Ball2 { center: Vec<f64>, radius: f64 },
    BallInf { center: Vec<f64>, radius: f64 },
    Ball1 { center: Vec<f64>, radius: f64 },
    Hyperrectangle { center: Vec<f64>, radius: Vec<f64> },
    Singleton { element: Vec<f64> },
    Zonotope { center: Vec<f64>, generators: Vec<Vec<f64>> },
    VPolytope { vertices: Vec<Vec<f64>> },
    HalfSpace { a: Vec<f64>, b: f64 },
    Hyperplane { a: Vec<f64>, b: f64 },
    MinkowskiSum { sets: Vec<SetExpr> },
    CachedMinkowskiSum { sets: Vec<SetExpr> },
    CartesianProduct { sets: Vec<SetExpr> },
    ConvexHull { sets: Vec<SetExpr> },
    Intersection { x: Box<SetExpr>, y: Box<SetExpr> },
    LinearMap { matrix: Vec<Vec<f64>>, set: Box<SetExpr> },
    ExponentialMap { matrix: Vec<Vec<f64>>, set: Box<SetExpr> },
    Ref { name: String },
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Def {
    pub name: String,
    pub set: SetExpr,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SetDoc {
    #[serde(default)]
    pub defs: Vec<Def>,
    pub set: SetExpr,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Input {
    Doc(SetDoc),
    Expr(SetExpr),
}

impl SetDoc {
    /// Parse a document or a bare expression.
    pub fn parse(text: &str) -> Result<Self> {
        let input: Input = serde_json::from_str(text).context("parsing set expression")?;
        Ok(match input {
            Input::Doc(doc) => doc,
            Input::Expr(set) => SetDoc {
                defs: Vec::new(),
                set,
            },
        })
    }

    /// Build the operand DAG; defs are evaluated in order.
    pub fn build(&self) -> Result<SetRef<f64>> {
        let mut env: HashMap<String, SetRef<f64>> = HashMap::new();
        for def in &self.defs {
            let s = def
                .set
                .build(&env)
                .with_context(|| format!("building def `{}`", def.name))?;
            if env.insert(def.name.clone(), s).is_some() {
                bail!("duplicate def `{}`", def.name);
            }
        }
        self.set.build(&env)
    }
}

fn dvec(x: &[f64]) -> DVector<f64> {
    DVector::from_column_slice(x)
}

fn matrix(rows: &[Vec<f64>]) -> Result<DMatrix<f64>> {
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|r| r.len() != ncols) {
        bail!("ragged matrix rows");
    }
    Ok(DMatrix::from_fn(nrows, ncols, |i, j| rows[i][j]))
}

fn columns(cols: &[Vec<f64>], dim: usize) -> Result<DMatrix<f64>> {
    if cols.iter().any(|c| c.len() != dim) {
        bail!("generator length differs from center length {dim}");
    }
    Ok(DMatrix::from_fn(dim, cols.len(), |i, j| cols[j][i]))
}

impl SetExpr {
    pub fn build(&self, env: &HashMap<String, SetRef<f64>>) -> Result<SetRef<f64>> {
        let all = |sets: &[SetExpr]| -> Result<Vec<SetRef<f64>>> {
            sets.iter().map(|s| s.build(env)).collect()
        };
        Ok(match self {
            SetExpr::Ball2 { center, radius } => Ball2::new(dvec(center), *radius)?.shared(),
            SetExpr::BallInf { center, radius } => BallInf::new(dvec(center), *radius)?.shared(),
            SetExpr::Ball1 { center, radius } => Ball1::new(dvec(center), *radius)?.shared(),
            SetExpr::Hyperrectangle { center, radius } => {
                Hyperrectangle::new(dvec(center), dvec(radius))?.shared()
            }
            SetExpr::Singleton { element } => Singleton::new(dvec(element)).shared(),
            SetExpr::Zonotope { center, generators } => {
                Zonotope::new(dvec(center), columns(generators, center.len())?)?.shared()
            }
            SetExpr::VPolytope { vertices } => {
                VPolytope::new(vertices.iter().map(|x| dvec(x)).collect())?.shared()
            }
            SetExpr::HalfSpace { a, b } => HalfSpace::new(dvec(a), *b)?.shared(),
            SetExpr::Hyperplane { a, b } => Hyperplane::new(dvec(a), *b)?.shared(),
            SetExpr::MinkowskiSum { sets } => match all(sets)?.as_slice() {
                [x, y] => MinkowskiSum::new(x.clone(), y.clone())?.shared(),
                many => MinkowskiSumArray::new(many.to_vec())?.shared(),
            },
            SetExpr::CachedMinkowskiSum { sets } => CachedMinkowskiSumArray::new(all(sets)?)?.shared(),
            SetExpr::CartesianProduct { sets } => CartesianProductArray::new(all(sets)?)?.shared(),
            SetExpr::ConvexHull { sets } => ConvexHullArray::new(all(sets)?)?.shared(),
            SetExpr::Intersection { x, y } => Intersection::new(x.build(env)?, y.build(env)?)?.shared(),
            SetExpr::LinearMap { matrix: m, set } => LinearMap::new(matrix(m)?, set.build(env)?)?.shared(),
            SetExpr::ExponentialMap { matrix: m, set } => {
                ExponentialMap::new(matrix(m)?, set.build(env)?)?.shared()
            }
            SetExpr::Ref { name } => env
                .get(name)
                .cloned()
                .ok_or_else(|| anyhow!("unknown set `{name}`"))?,
        })
    }
}
