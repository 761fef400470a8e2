// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of the VMD-like selection language for selecting groups of atoms.
//!
//! ## Keywords
//! - `resname` / `name` (`atomname`): residue and atom names, literal or `r'regex'`
//! - `resid` (`resnum`): residue numbers as written in the structure file
//! - `resindex`: residue indices counted from 0 in order of appearance
//! - `serial`: atom indices counted from 1 (GROMACS numbering)
//! - `atomid` (`atomnum`): atom numbers as written in the structure file
//! - `chain`: single-character chain identifiers
//! - `group` or a bare word: groups defined in the system (e.g. `all` or groups from an ndx file)
//!
//! Numbers can be given individually, as ranges (`1 to 5`, `1-5`) or as open intervals (`< 10`, `>= 4`).
//! Selections can be combined using `and` (`&&`), `or` (`||`), `not` (`!`), and parentheses.
//! Macros `@protein`, `@backbone`, `@water`, `@ion`, `@membrane`, `@dna`, and `@rna` are expanded
//! into their definitions before parsing.

use hashbrown::HashMap;

use crate::errors::SelectError;
use crate::system::System;

use self::name::Name;

mod name;
mod numbers;

#[derive(Debug, PartialEq, Clone)]
pub enum Select {
    ResidueName(Vec<Name>),
    AtomName(Vec<Name>),
    ResidueNumber(Vec<(usize, usize)>),
    ResidueIndex(Vec<(usize, usize)>),
    GmxAtomNumber(Vec<(usize, usize)>),
    AtomNumber(Vec<(usize, usize)>),
    Chain(Vec<char>),
    GroupName(Vec<Name>),
    And(Box<Select>, Box<Select>),
    Or(Box<Select>, Box<Select>),
    Not(Box<Select>),
}

#[derive(Debug, PartialEq, Clone, Copy)]
enum Operator {
    And,
    Or,
}

impl Select {
    /// Construct a Selection tree (`Select` structure) from the given VMD-like selection language query.
    ///
    /// ## Example
    /// ```
    /// use flexan::select::Select;
    ///
    /// let select = Select::parse_query("resname LYS and name CA").unwrap();
    /// assert!(matches!(*select, Select::And(_, _)));
    /// ```
    pub fn parse_query(query: &str) -> Result<Box<Select>, SelectError> {
        // check that the expression is not empty
        if query.trim().is_empty() {
            return Err(SelectError::EmptyQuery);
        }

        // check that parentheses are balanced and properly nested
        if !par_balanced(query) {
            return Err(SelectError::InvalidParentheses(query.to_string()));
        }

        // check that the number of ' and " quotes is even, i.e. all quote-blocks are closed
        if !quotes_balanced(query) {
            return Err(SelectError::InvalidQuotes(query.to_string()));
        }

        // expand macros
        let mut expression = query.to_string();
        if expression.contains('@') {
            expand_macros(&mut expression, &get_macros());
        }

        // replace word operators with their symbolic equivalents
        let expression: Vec<char> = replace_keywords(&expression).chars().collect();

        parse_subquery(&expression, 0, expression.len()).map_err(|e| attach_query(e, query))
    }

    /// Expand regular expressions for `GroupName` into actual group names matching the regex.
    ///
    /// Checks that all `String` groups actually exist and ensures that at least one group
    /// is present in each `Select::GroupName`.
    pub(crate) fn expand_regex_group(self, system: &System) -> Result<Self, SelectError> {
        match self {
            Select::GroupName(vector) => {
                let mut expanded = Vec::new();

                for name in vector.iter() {
                    match name {
                        Name::String(s) => {
                            if !system.group_exists(s) {
                                return Err(SelectError::GroupNotFound(s.clone()));
                            }
                            expanded.push(Name::String(s.clone()));
                        }
                        Name::Regex(r) => {
                            for key in system.get_groups_as_ref().keys() {
                                if r.is_match(key) {
                                    expanded.push(Name::String(key.to_owned()));
                                }
                            }
                        }
                    }
                }

                if expanded.is_empty() {
                    return Err(SelectError::NoRegexMatch(
                        vector
                            .iter()
                            .map(|n| n.to_string())
                            .collect::<Vec<String>>()
                            .join(" "),
                    ));
                }

                Ok(Select::GroupName(expanded))
            }
            Select::And(left, right) => Ok(Select::And(
                Box::from(left.expand_regex_group(system)?),
                Box::from(right.expand_regex_group(system)?),
            )),
            Select::Or(left, right) => Ok(Select::Or(
                Box::from(left.expand_regex_group(system)?),
                Box::from(right.expand_regex_group(system)?),
            )),
            Select::Not(op) => Ok(Select::Not(Box::from(op.expand_regex_group(system)?))),
            other => Ok(other),
        }
    }
}

/// Replace the placeholder in errors raised while parsing subqueries with the full query.
fn attach_query(error: SelectError, query: &str) -> SelectError {
    let query = query.to_string();
    match error {
        SelectError::InvalidOperator(_) => SelectError::InvalidOperator(query),
        SelectError::MissingArgument(_) => SelectError::MissingArgument(query),
        SelectError::EmptyArgument(_) => SelectError::EmptyArgument(query),
        SelectError::InvalidParentheses(_) => SelectError::InvalidParentheses(query),
        SelectError::InvalidNumber(_) => SelectError::InvalidNumber(query),
        SelectError::InvalidChainId(_) => SelectError::InvalidChainId(query),
        SelectError::InvalidTokenParentheses(_) => SelectError::InvalidTokenParentheses(query),
        SelectError::InvalidRegex(e) => SelectError::InvalidRegex(e),
        _ => SelectError::UnknownError(query),
    }
}

fn parse_subquery(expression: &[char], start: usize, end: usize) -> Result<Box<Select>, SelectError> {
    let mut tree: Option<Box<Select>> = None;

    let mut i = start;

    let mut token = String::new();
    let mut negations = 0usize;
    let mut binary_operator: Option<Operator> = None;

    let mut inside_quotes = false;

    while i < end {
        let c = expression[i];

        // operators inside quote blocks are part of the name
        if c == '\'' || c == '"' {
            inside_quotes = !inside_quotes;
            token.push(c);
            i += 1;
            continue;
        }

        if inside_quotes {
            token.push(c);
            i += 1;
            continue;
        }

        match c {
            '(' => {
                if !token.trim().is_empty() {
                    return Err(SelectError::InvalidTokenParentheses("".to_string()));
                }

                let new_end = find_parenthesis(expression, i, end)
                    .ok_or(SelectError::InvalidParentheses("".to_string()))?;

                let parsed = parse_subquery(expression, i + 1, new_end)?;
                tree = process_operation(tree, parsed, &mut negations, binary_operator)?;

                binary_operator = None;

                i = new_end + 1;
            }

            ')' => return Err(SelectError::InvalidParentheses("".to_string())),

            // binary operators
            '&' | '|' => {
                let operator = match find_operator(expression, c, i) {
                    Some(op) => op,
                    None => return Err(SelectError::InvalidOperator("".to_string())),
                };

                if !token.trim().is_empty() {
                    // parse the token and process the queued operations
                    let parsed = Box::from(parse_token(&token)?);
                    tree = process_operation(tree, parsed, &mut negations, binary_operator)?;
                    token.clear();
                } else if tree.is_none() || binary_operator.is_some() {
                    return Err(SelectError::MissingArgument("".to_string()));
                }

                binary_operator = Some(operator);
                i += 2;
            }

            // NOT operator
            '!' => {
                if !token.trim().is_empty() {
                    return Err(SelectError::InvalidOperator("".to_string()));
                }
                negations += 1;
                i += 1;
            }

            // unexpanded macros or other misplaced symbols
            '@' => return Err(SelectError::InvalidOperator("".to_string())),

            _ => {
                token.push(c);
                i += 1;
            }
        }
    }

    // process the last operation
    if !token.trim().is_empty() {
        let parsed = Box::from(parse_token(&token)?);
        tree = process_operation(tree, parsed, &mut negations, binary_operator)?;
    } else if binary_operator.is_some() || negations > 0 {
        return Err(SelectError::MissingArgument("".to_string()));
    }

    tree.ok_or(SelectError::MissingArgument("".to_string()))
}

fn process_operation(
    tree: Option<Box<Select>>,
    mut parsed: Box<Select>,
    negations: &mut usize,
    binary: Option<Operator>,
) -> Result<Option<Box<Select>>, SelectError> {
    // apply the queued negations to the parsed token
    for _ in 0..*negations {
        parsed = Box::from(Select::Not(parsed));
    }
    *negations = 0;

    match (tree, binary) {
        (Some(t), Some(Operator::And)) => Ok(Some(Box::from(Select::And(t, parsed)))),
        (Some(t), Some(Operator::Or)) => Ok(Some(Box::from(Select::Or(t, parsed)))),
        (None, Some(_)) => Err(SelectError::MissingArgument("".to_string())),
        // two operands with no operator between them
        (Some(_), None) => Err(SelectError::InvalidTokenParentheses("".to_string())),
        (None, None) => Ok(Some(parsed)),
    }
}

fn find_operator(expression: &[char], op_symbol: char, start: usize) -> Option<Operator> {
    if expression.get(start + 1) != Some(&op_symbol) {
        return None;
    }

    match op_symbol {
        '&' => Some(Operator::And),
        '|' => Some(Operator::Or),
        _ => None,
    }
}

/// Check that every '(' has a matching ')' which follows it.
fn par_balanced(string: &str) -> bool {
    let mut depth = 0i64;
    for c in string.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => (),
        }
    }

    depth == 0
}

/// Check whether the number of ' and " is even.
fn quotes_balanced(string: &str) -> bool {
    let single = string.chars().filter(|&c| c == '\'').count();
    let double = string.chars().filter(|&c| c == '"').count();

    single % 2 == 0 && double % 2 == 0
}

const PROTEIN_RESIDUES: &str = "ABU ACE AIB ALA ARG ARGN ASN ASN1 ASP ASP1 ASPH ASPP ASH CT3 CYS CYS1 CYS2 CYSH DALA GLN GLU GLUH GLUP GLH GLY HIS HIS1 HISA HISB HISH HISD HISE HISP HSD HSE HSP HYP ILE LEU LSN LYS LYSN LYSH MELEU MET MEVAL NAC NME NHE NH2 PHE PHEH PHEU PHL PRO SER THR TRP TRPH TRPU TYR TYRH TYRU VAL PGLU HID HIE HIP LYP LYN CYN CYM CYX DAB ORN NALA NGLY NSER NTHR NLEU NILE NVAL NASN NGLN NARG NHID NHIE NHIP NHISD NHISE NHISH NTRP NPHE NTYR NGLU NASP NLYS NORN NDAB NLYSN NPRO NHYP NCYS NCYS2 NMET NASPH NGLUH CALA CGLY CSER CTHR CLEU CILE CVAL CASN CGLN CARG CHID CHIE CHIP CHISD CHISE CHISH CTRP CPHE CTYR CGLU CASP CLYS CORN CDAB CLYSN CPRO CHYP CCYS CCYS2 CMET CASPH CGLUH";

const MEMBRANE_RESIDUES: &str = "DAPC DBPC DFPC DGPC DIPC DLPC DNPC DOPC DPPC DRPC DTPC DVPC DXPC DYPC LPPC PAPC PEPC PGPC PIPC POPC PRPC PUPC DAPE DBPE DFPE DGPE DIPE DLPE DNPE DOPE DPPE DRPE DTPE DUPE DVPE DXPE DYPE LPPE PAPE PGPE PIPE POPE PQPE PRPE PUPE DAPS DBPS DFPS DGPS DIPS DLPS DNPS DOPS DPPS DRPS DTPS DUPS DVPS DXPS DYPS LPPS PAPS PGPS PIPS POPS PQPS PRPS PUPS DAPG DBPG DFPG DGPG DIPG DLPG DNPG DOPG DPPG DRPG DTPG DVPG DXPG DYPG JFPG JPPG LPPG OPPG PAPG PGPG PIPG POPG PRPG DAPA DBPA DFPA DGPA DIPA DLPA DNPA DOPA DPPA DRPA DTPA DVPA DXPA DYPA LPPA PAPA PGPA PIPA POPA PRPA PUPA DPP1 DPP2 DPPI PAPI PIPI POP1 POP2 POP3 POPI PUPI PVP1 PVP2 PVP3 PVPI PADG PIDG PODG PUDG PVDG TOG APC CPC IPC LPC OPC PPC TPC UPC VPC BNSM DBSM DPSM DXSM PGSM PNSM POSM PVSM XNSM DPCE DXCE PNCE XNCE DBG1 DPG1 DPG3 DPGS DXG1 DXG3 PNG1 PNG3 XNG1 XNG3 DFGG DFMG DPGG DPMG DPSG FPGG FPMG FPSG OPGG OPMG OPSG CHOA CHOL CHYO BOG DDM DPC EO5 SDS BOLA BOLB CDL0 CDL1 CDL2 CDL DBG3 ERGO HBHT HDPT HHOP HOPR ACA ACN BCA BCN LCA LCN PCA PCN UCA UCN XCA XCN RAMP REMP OANT POPC POPE POPS CHL1";

const ION_NAMES: &str = "NA NA+ CL CL- K K+ SOD CLA CA CA2+ MG ZN CU1 CU LI RB CS F BR I OH Cal CAL IB+ POT CAL";

/// Macros @protein, @water, @ion, @dna, @rna are partly based on https://github.com/gromacs/gromacs/blob/main/share/top/residuetypes.dat
fn get_macros() -> HashMap<&'static str, String> {
    let mut macros = HashMap::new();

    macros.insert("@protein", format!("(resname {})", PROTEIN_RESIDUES));
    macros.insert(
        "@backbone",
        format!("(name N CA C O and resname {})", PROTEIN_RESIDUES),
    );
    macros.insert("@membrane", format!("(resname {})", MEMBRANE_RESIDUES));
    macros.insert(
        "@water",
        "(name W OW HW1 HW2 OH2 H1 H2 and resname SOL WAT HOH OHH TIP T3P T4P T5P T3H W TIP3 TIP4 SPC SPCE)".to_string(),
    );
    macros.insert(
        "@ion",
        format!("(name {} and resname ION {})", ION_NAMES, ION_NAMES),
    );
    macros.insert(
        "@dna",
        "(resname DA DG DC DT DA5 DG5 DC5 DT5 DA3 DG3 DC3 DT3 DAN DGN DCN DTN)".to_string(),
    );
    macros.insert(
        "@rna",
        "(resname A U C G RA RU RC RG RA5 RT5 RU5 RC5 RG5 RA3 RT3 RU3 RC3 RG3 RAN RTN RUN RCN RGN)"
            .to_string(),
    );

    macros
}

fn expand_macros(string: &mut String, macros: &HashMap<&str, String>) {
    for (m, expand) in macros {
        *string = string.replace(m, expand);
    }
}

/// Find the index of the parenthesis closing the parenthesis at index `start`.
fn find_parenthesis(expression: &[char], start: usize, end: usize) -> Option<usize> {
    let mut depth = 0usize;

    for (index, &c) in expression.iter().enumerate().take(end).skip(start) {
        if c == '(' {
            depth += 1;
        } else if c == ')' {
            depth -= 1;
            if depth == 0 {
                return Some(index);
            }
        }
    }

    None
}

/// Replace alphabetical keywords with their symbolic representations.
/// Ignores quote blocks.
fn replace_keywords(input: &str) -> String {
    let mut result = String::new();
    let mut input_chars = input.chars().peekable();
    let mut inside_quotes = false;

    while let Some(c) = input_chars.next() {
        if c == '\'' || c == '"' {
            inside_quotes = !inside_quotes;
            result.push(c);
            continue;
        }

        if inside_quotes {
            result.push(c);
            continue;
        }

        if c.is_alphabetic() {
            let mut keyword = String::from(c);
            while let Some(&next) = input_chars.peek() {
                if !next.is_alphabetic() {
                    break;
                }
                keyword.push(next);
                input_chars.next();
            }

            let replaced = match keyword.as_str() {
                "and" => "&&",
                "or" => "||",
                "not" => "!",
                "to" => "-",
                _ => keyword.as_str(),
            };
            result.push_str(replaced);
        } else {
            result.push(c);
        }
    }

    result
}

/// Split a string by whitespace while keeping the items enclosed in ' or " together.
/// Regular expressions keep their `r'...'` wrapping.
fn split_with_quotes(string: &str) -> Vec<String> {
    let mut result = vec![String::new()];
    let mut inside = false;
    let mut regex = false;

    let mut iterator = string.chars().peekable();

    while let Some(c) = iterator.next() {
        let current = result.len() - 1;

        if c == 'r' && !inside && result[current].is_empty() && iterator.peek() == Some(&'\'') {
            regex = true;
            inside = true;
            result[current].push_str("r'");
            iterator.next();
            continue;
        }

        if c == '\'' || c == '"' {
            inside = !inside;
            if regex {
                result[current].push(c);
                regex = false;
            }
            continue;
        }

        if c.is_whitespace() && !inside {
            result.push(String::new());
            continue;
        }

        result[current].push(c);
    }

    result
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .collect()
}

/// Collect words from the query and convert them to the `Name` enum.
fn collect_words(token: &[String]) -> Result<Vec<Name>, SelectError> {
    token.iter().map(|s| Name::new(s)).collect()
}

/// Collect numbers from the query and merge them into non-overlapping ranges.
fn collect_numbers(token: &[String], lowest: usize) -> Result<Vec<(usize, usize)>, SelectError> {
    numbers::parse_numbers(token, lowest).map(fix_ranges)
}

fn parse_token(string: &str) -> Result<Select, SelectError> {
    let token = split_with_quotes(string);
    let (keyword, arguments) = match token.split_first() {
        Some(x) => x,
        None => return Err(SelectError::MissingArgument("".to_string())),
    };

    let is_keyword = matches!(
        keyword.as_str(),
        "resname"
            | "name"
            | "atomname"
            | "resid"
            | "resnum"
            | "resindex"
            | "serial"
            | "atomid"
            | "atomnum"
            | "chain"
            | "group"
    );

    if is_keyword && arguments.is_empty() {
        return Err(SelectError::EmptyArgument("".to_string()));
    }

    match keyword.as_str() {
        "resname" => Ok(Select::ResidueName(collect_words(arguments)?)),
        "name" | "atomname" => Ok(Select::AtomName(collect_words(arguments)?)),
        "resid" | "resnum" => Ok(Select::ResidueNumber(collect_numbers(arguments, 1)?)),
        "resindex" => Ok(Select::ResidueIndex(collect_numbers(arguments, 0)?)),
        "serial" => Ok(Select::GmxAtomNumber(collect_numbers(arguments, 1)?)),
        "atomid" | "atomnum" => Ok(Select::AtomNumber(collect_numbers(arguments, 1)?)),
        "chain" => arguments
            .iter()
            .map(|t| {
                let mut chars = t.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(SelectError::InvalidChainId("".to_string())),
                }
            })
            .collect::<Result<Vec<char>, SelectError>>()
            .map(Select::Chain),
        "group" => Ok(Select::GroupName(collect_words(arguments)?)),
        // it is not necessary to provide group identifier for groups
        _ => Ok(Select::GroupName(collect_words(&token)?)),
    }
}

/// Sort the ranges and merge overlapping or adjacent ones.
fn fix_ranges(mut ranges: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    ranges.retain(|(start, end)| start <= end);
    ranges.sort_unstable();

    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        match merged.last_mut() {
            Some(last) if start <= last.1.saturating_add(1) => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }

    merged
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod pass_tests {
    use super::*;

    macro_rules! parsing_success {
        ($name:ident, $expression:expr, $expected:expr) => {
            #[test]
            fn $name() {
                match Select::parse_query($expression) {
                    Ok(x) => assert_eq!(*x, $expected),
                    Err(e) => panic!("Parsing failed, returning {:?}", e),
                }
            }
        };
    }

    fn names(names: &[&str]) -> Vec<Name> {
        names.iter().map(|n| Name::new(n).unwrap()).collect()
    }

    parsing_success!(
        resname_simple,
        "resname LYS ARG",
        Select::ResidueName(names(&["LYS", "ARG"]))
    );

    parsing_success!(
        atomname_simple,
        "name CA",
        Select::AtomName(names(&["CA"]))
    );

    parsing_success!(
        atomname_alias,
        "atomname CA CB",
        Select::AtomName(names(&["CA", "CB"]))
    );

    parsing_success!(
        resid_ranges,
        "resid 1 to 5 8 4-6 12",
        Select::ResidueNumber(vec![(1, 6), (8, 8), (12, 12)])
    );

    parsing_success!(
        resid_open,
        "resnum <= 10 >15",
        Select::ResidueNumber(vec![(1, 10), (16, usize::MAX)])
    );

    parsing_success!(
        resindex_open,
        "resindex < 10",
        Select::ResidueIndex(vec![(0, 9)])
    );

    parsing_success!(
        serial,
        "serial 1-100",
        Select::GmxAtomNumber(vec![(1, 100)])
    );

    parsing_success!(
        atomid,
        "atomid 20 21 22",
        Select::AtomNumber(vec![(20, 22)])
    );

    parsing_success!(chain, "chain A B", Select::Chain(vec!['A', 'B']));

    parsing_success!(
        group_explicit,
        "group Protein",
        Select::GroupName(names(&["Protein"]))
    );

    parsing_success!(
        group_implicit,
        "Protein Membrane",
        Select::GroupName(names(&["Protein", "Membrane"]))
    );

    parsing_success!(
        group_quoted,
        "'Protein and Membrane'",
        Select::GroupName(names(&["Protein and Membrane"]))
    );

    parsing_success!(
        regex_name,
        "name r'^C[AB]$'",
        Select::AtomName(vec![Name::new("r'^C[AB]$'").unwrap()])
    );

    parsing_success!(
        and_words,
        "resname LYS and name CA",
        Select::And(
            Box::new(Select::ResidueName(names(&["LYS"]))),
            Box::new(Select::AtomName(names(&["CA"])))
        )
    );

    parsing_success!(
        or_symbols,
        "resname LYS || name CA",
        Select::Or(
            Box::new(Select::ResidueName(names(&["LYS"]))),
            Box::new(Select::AtomName(names(&["CA"])))
        )
    );

    parsing_success!(
        not_word,
        "not name CA",
        Select::Not(Box::new(Select::AtomName(names(&["CA"]))))
    );

    parsing_success!(
        left_associative,
        "name CA or name CB and resid 1",
        Select::And(
            Box::new(Select::Or(
                Box::new(Select::AtomName(names(&["CA"]))),
                Box::new(Select::AtomName(names(&["CB"])))
            )),
            Box::new(Select::ResidueNumber(vec![(1, 1)]))
        )
    );

    parsing_success!(
        parentheses,
        "name CA or (name CB and resid 1)",
        Select::Or(
            Box::new(Select::AtomName(names(&["CA"]))),
            Box::new(Select::And(
                Box::new(Select::AtomName(names(&["CB"]))),
                Box::new(Select::ResidueNumber(vec![(1, 1)]))
            ))
        )
    );

    parsing_success!(
        negated_parentheses,
        "!(resid 1 2) && chain A",
        Select::And(
            Box::new(Select::Not(Box::new(Select::ResidueNumber(vec![(1, 2)])))),
            Box::new(Select::Chain(vec!['A']))
        )
    );

    parsing_success!(
        nested_parentheses,
        "((resname LYS))",
        Select::ResidueName(names(&["LYS"]))
    );

    parsing_success!(
        macro_dna,
        "@dna",
        Select::ResidueName(names(&[
            "DA", "DG", "DC", "DT", "DA5", "DG5", "DC5", "DT5", "DA3", "DG3", "DC3", "DT3", "DAN",
            "DGN", "DCN", "DTN"
        ]))
    );

    #[test]
    fn macro_backbone() {
        match *Select::parse_query("@backbone").unwrap() {
            Select::And(left, right) => {
                assert_eq!(*left, Select::AtomName(names(&["N", "CA", "C", "O"])));
                match *right {
                    Select::ResidueName(v) => assert!(v.contains(&Name::new("LYS").unwrap())),
                    _ => panic!("Unexpected right operand."),
                }
            }
            _ => panic!("Backbone macro should expand into an AND operation."),
        }
    }

    #[test]
    fn fix_ranges_merging() {
        assert_eq!(
            fix_ranges(vec![(10, 15), (17, 25), (11, 11), (7, 3), (9, 10), (16, 18), (2, 5)]),
            vec![(2, 5), (9, 25)]
        );
    }
}
