//! Selector matching against the node store
//!
//! Matching starts at the subject compound and walks the combinator chain
//! leftwards, backtracking over ancestors and siblings when a descendant or
//! subsequent-sibling combinator has more than one candidate.

use arbor_dom::{ElementData, NodeData, NodeId, NodeStore};

use crate::selectors::{
    Combinator, ComplexSelector, CompoundSelector, PseudoClass, SelectorList, SimpleSelector,
};

/// Does `element` match any selector in the list?
pub fn matches_list(store: &NodeStore, list: &SelectorList, element: NodeId) -> bool {
    list.0.iter().any(|selector| matches_complex(store, selector, element))
}

/// Does `element` match this complex selector?
pub fn matches_complex(store: &NodeStore, selector: &ComplexSelector, element: NodeId) -> bool {
    matches_compound(store, &selector.subject, element)
        && matches_chain(store, &selector.combinators, element)
}

fn matches_chain(
    store: &NodeStore,
    chain: &[(Combinator, CompoundSelector)],
    element: NodeId,
) -> bool {
    let Some(((combinator, compound), rest)) = chain.split_first() else {
        return true;
    };

    let candidate_matches = |candidate: NodeId| {
        matches_compound(store, compound, candidate) && matches_chain(store, rest, candidate)
    };

    match combinator {
        Combinator::Child => store.parent_element(element).is_some_and(candidate_matches),
        Combinator::Descendant => store
            .ancestors(element)
            .take_while(|&a| store.is_element(a))
            .any(candidate_matches),
        Combinator::NextSibling => store
            .previous_element_sibling(element)
            .is_some_and(candidate_matches),
        Combinator::SubsequentSibling => {
            std::iter::successors(store.previous_element_sibling(element), |&s| {
                store.previous_element_sibling(s)
            })
            .any(candidate_matches)
        }
    }
}

fn matches_compound(store: &NodeStore, compound: &CompoundSelector, element: NodeId) -> bool {
    let Some(data) = store.element(element) else {
        return false;
    };
    compound
        .simple_selectors
        .iter()
        .all(|simple| matches_simple(store, simple, element, data))
}

fn matches_simple(
    store: &NodeStore,
    simple: &SimpleSelector,
    element: NodeId,
    data: &ElementData,
) -> bool {
    match simple {
        SimpleSelector::Universal => true,
        SimpleSelector::Type(tag) => {
            if data.is_html() {
                data.local_name().eq_ignore_ascii_case(tag)
            } else {
                data.local_name() == tag
            }
        }
        SimpleSelector::Id(id) => data.id() == Some(id.as_str()),
        SimpleSelector::Class(class) => data.has_class(class),
        SimpleSelector::Attribute(attr) => attr.matches(attribute_value(data, &attr.name)),
        SimpleSelector::PseudoClass(pseudo) => matches_pseudo_class(store, pseudo, element, data),
    }
}

/// Attribute names compare case-insensitively on HTML elements
fn attribute_value<'a>(data: &'a ElementData, name: &str) -> Option<&'a str> {
    let html = data.is_html();
    data.attrs()
        .iter()
        .find(|a| {
            let qualified = a.qualified_name();
            if html {
                qualified.eq_ignore_ascii_case(name)
            } else {
                qualified == name
            }
        })
        .map(|a| a.value.as_str())
}

/// 1-based position of an element among its element siblings
struct SiblingPosition {
    index: usize,
    count: usize,
}

impl SiblingPosition {
    fn of(store: &NodeStore, element: NodeId, same_type: Option<&ElementData>) -> Self {
        let Some(parent) = store.parent(element) else {
            return Self { index: 1, count: 1 };
        };

        let mut index = 0;
        let mut count = 0;
        for sibling in store.children(parent) {
            let Some(sibling_data) = store.element(sibling) else {
                continue;
            };
            if let Some(data) = same_type
                && (sibling_data.name.ns != data.name.ns
                    || sibling_data.local_name() != data.local_name())
            {
                continue;
            }
            count += 1;
            if sibling == element {
                index = count;
            }
        }
        Self { index, count }
    }

    fn from_end(&self) -> usize {
        self.count + 1 - self.index
    }
}

fn matches_pseudo_class(
    store: &NodeStore,
    pseudo: &PseudoClass,
    element: NodeId,
    data: &ElementData,
) -> bool {
    let position = |same_type: bool| SiblingPosition::of(store, element, same_type.then_some(data));

    match pseudo {
        // Tree-structural pseudo-classes
        PseudoClass::Root => store
            .parent(element)
            .is_some_and(|p| matches!(store.data(p), NodeData::Document)),
        PseudoClass::Empty => store.children(element).all(|child| match store.data(child) {
            NodeData::Element(_) => false,
            NodeData::Text(text) => text.is_empty(),
            _ => true,
        }),
        PseudoClass::FirstChild => store.previous_element_sibling(element).is_none(),
        PseudoClass::LastChild => store.next_element_sibling(element).is_none(),
        PseudoClass::OnlyChild => {
            store.previous_element_sibling(element).is_none()
                && store.next_element_sibling(element).is_none()
        }
        PseudoClass::FirstOfType => position(true).index == 1,
        PseudoClass::LastOfType => position(true).from_end() == 1,
        PseudoClass::OnlyOfType => position(true).count == 1,
        PseudoClass::NthChild(expr) => expr.matches(position(false).index as i32),
        PseudoClass::NthLastChild(expr) => expr.matches(position(false).from_end() as i32),
        PseudoClass::NthOfType(expr) => expr.matches(position(true).index as i32),
        PseudoClass::NthLastOfType(expr) => expr.matches(position(true).from_end() as i32),

        // Logical pseudo-classes
        PseudoClass::Not(list) => !matches_list(store, list, element),
        PseudoClass::Is(list) | PseudoClass::Where(list) => matches_list(store, list, element),

        // Input pseudo-classes
        PseudoClass::Checked => is_checked(data),
        PseudoClass::Disabled => is_form_control(data) && data.get("disabled").is_some(),
        PseudoClass::Enabled => is_form_control(data) && data.get("disabled").is_none(),
    }
}

fn is_form_control(data: &ElementData) -> bool {
    data.is_html()
        && matches!(
            data.local_name(),
            "button" | "input" | "select" | "textarea" | "optgroup" | "option" | "fieldset"
        )
}

fn is_checked(data: &ElementData) -> bool {
    if data.is("input") {
        let kind = data.get("type").unwrap_or("");
        (kind.eq_ignore_ascii_case("checkbox") || kind.eq_ignore_ascii_case("radio"))
            && data.get("checked").is_some()
    } else {
        data.is("option") && data.get("selected").is_some()
    }
}
