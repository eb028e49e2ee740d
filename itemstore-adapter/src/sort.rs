/// A sort directive over one item property.
///
/// `P` names the property in whatever vocabulary the consumer uses (an enum,
/// a column id, a string key); the adapter never interprets it, it only hands
/// the directives to the query descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemSort<P> {
    property: P,
    ascending: bool,
}

impl<P> ItemSort<P> {
    pub fn of(property: P, ascending: bool) -> Self {
        Self {
            property,
            ascending,
        }
    }

    pub fn asc(property: P) -> Self {
        Self::of(property, true)
    }

    pub fn desc(property: P) -> Self {
        Self::of(property, false)
    }

    pub fn property(&self) -> &P {
        &self.property
    }

    pub fn is_ascending(&self) -> bool {
        self.ascending
    }
}

/// A query descriptor that can carry sort state.
///
/// Implementing this for the provider's query type lets
/// [`crate::DataSource::sort`] update the ordering without knowing anything
/// else about the descriptor; the provider stays responsible for actually
/// applying the sorts to its result set.
pub trait SortableQuery<P> {
    fn apply_sorts(&mut self, sorts: &[ItemSort<P>]);
}
