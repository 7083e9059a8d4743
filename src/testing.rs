//! In-memory store doubles for service tests.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use anyhow::bail;
use async_trait::async_trait;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::{
    ingredients::{
        repo::IngredientStore,
        repo_types::{Ingredient, RecipeIngredientRow},
    },
    instructions::{repo::InstructionStore, repo_types::Instruction},
    meal_plans::{
        repo::MealPlanStore,
        repo_types::{MealPlan, MealPlanEntry, NewMealPlan, PlannedRecipe},
    },
    recipes::{
        repo::RecipeStore,
        repo_types::{IngredientLine, Recipe, RecipeDetails, RecipeDraft},
    },
    shopping_lists::{
        aggregate::AggregatedItem,
        repo::ShoppingListStore,
        repo_types::{ShoppingList, ShoppingListItem, ShoppingListItemView, ShoppingListSummary},
    },
};

#[derive(Default)]
struct Inner {
    ingredient_names: HashMap<Uuid, String>,
    recipes: Vec<Recipe>,
    lines: Vec<(Uuid, IngredientLine)>,
    instructions: Vec<Instruction>,
    meal_plans: Vec<MealPlan>,
    lists: Vec<ShoppingList>,
    items: Vec<ShoppingListItem>,
    meal_plan_reads: usize,
    fail_item_writes: bool,
    fail_plan_reads: bool,
}

impl Inner {
    fn ingredient_id(&mut self, name: &str) -> Uuid {
        if let Some((id, _)) = self
            .ingredient_names
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
        {
            return *id;
        }
        let id = Uuid::new_v4();
        self.ingredient_names.insert(id, name.to_string());
        id
    }

    fn lines_of(&self, recipe_id: Uuid) -> Vec<IngredientLine> {
        self.lines
            .iter()
            .filter(|(r, _)| *r == recipe_id)
            .map(|(_, l)| l.clone())
            .collect()
    }

    fn replace_children(&mut self, recipe_id: Uuid, draft: &RecipeDraft) {
        self.lines.retain(|(r, _)| *r != recipe_id);
        self.instructions.retain(|i| i.recipe_id != recipe_id);
        for ing in &draft.ingredients {
            let ingredient_id = self.ingredient_id(&ing.name);
            let name = self.ingredient_names[&ingredient_id].clone();
            self.lines.push((
                recipe_id,
                IngredientLine {
                    id: Uuid::new_v4(),
                    ingredient_id,
                    name,
                    quantity: ing.quantity,
                    unit: ing.unit.clone(),
                },
            ));
        }
        for (i, text) in draft.instructions.iter().enumerate() {
            self.instructions.push(Instruction {
                id: Uuid::new_v4(),
                recipe_id,
                step_number: i as i32 + 1,
                text: text.clone(),
            });
        }
    }

    fn plans_in_range(&self, user_id: Uuid, start: Date, end: Date) -> Vec<MealPlan> {
        let mut plans: Vec<MealPlan> = self
            .meal_plans
            .iter()
            .filter(|p| p.user_id == user_id && p.date >= start && p.date <= end)
            .cloned()
            .collect();
        plans.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.meal_type.cmp(&b.meal_type)));
        plans
    }

    fn recipe(&self, id: Uuid) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }
}

/// One store backing every `*Store` trait, so services see a consistent world.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    /// Insert a recipe with lines given as `(ingredient id, name, quantity, unit)`.
    pub fn seed_recipe(
        &self,
        user_id: Uuid,
        name: &str,
        servings: i32,
        lines: &[(Uuid, &str, f64, &str)],
    ) -> Recipe {
        let now = OffsetDateTime::now_utc();
        let recipe = Recipe {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            description: String::new(),
            category: String::new(),
            servings,
            prep_time: 0,
            cook_time: 0,
            created_at: now,
            updated_at: now,
        };
        let mut inner = self.lock();
        for (ingredient_id, ingredient_name, quantity, unit) in lines {
            inner
                .ingredient_names
                .entry(*ingredient_id)
                .or_insert_with(|| ingredient_name.to_string());
            inner.lines.push((
                recipe.id,
                IngredientLine {
                    id: Uuid::new_v4(),
                    ingredient_id: *ingredient_id,
                    name: ingredient_name.to_string(),
                    quantity: *quantity,
                    unit: unit.to_string(),
                },
            ));
        }
        inner.recipes.push(recipe.clone());
        recipe
    }

    pub fn seed_meal_plan(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
        date: Date,
        meal_type: &str,
        target_servings: i32,
    ) -> MealPlan {
        let now = OffsetDateTime::now_utc();
        let plan = MealPlan {
            id: Uuid::new_v4(),
            user_id,
            recipe_id,
            date,
            meal_type: meal_type.to_string(),
            target_servings,
            created_at: now,
            updated_at: now,
        };
        self.lock().meal_plans.push(plan.clone());
        plan
    }

    pub fn meal_plan_count(&self) -> usize {
        self.lock().meal_plans.len()
    }

    pub fn shopping_list_count(&self) -> usize {
        self.lock().lists.len()
    }

    /// Range reads served by the meal-plan store so far.
    pub fn meal_plan_reads(&self) -> usize {
        self.lock().meal_plan_reads
    }

    pub fn fail_item_writes(&self) {
        self.lock().fail_item_writes = true;
    }

    pub fn fail_plan_reads(&self) {
        self.lock().fail_plan_reads = true;
    }
}

#[async_trait]
impl RecipeStore for InMemoryStore {
    async fn create(&self, user_id: Uuid, draft: &RecipeDraft) -> anyhow::Result<Recipe> {
        let now = OffsetDateTime::now_utc();
        let recipe = Recipe {
            id: Uuid::new_v4(),
            user_id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            category: draft.category.clone(),
            servings: draft.servings,
            prep_time: draft.prep_time,
            cook_time: draft.cook_time,
            created_at: now,
            updated_at: now,
        };
        let mut inner = self.lock();
        inner.replace_children(recipe.id, draft);
        inner.recipes.push(recipe.clone());
        Ok(recipe)
    }

    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Recipe>> {
        Ok(self
            .lock()
            .recipes
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Recipe>> {
        Ok(self.lock().recipe(id).cloned())
    }

    async fn find_with_details(&self, id: Uuid) -> anyhow::Result<Option<RecipeDetails>> {
        let inner = self.lock();
        let Some(recipe) = inner.recipe(id).cloned() else {
            return Ok(None);
        };
        let mut instructions: Vec<Instruction> = inner
            .instructions
            .iter()
            .filter(|i| i.recipe_id == id)
            .cloned()
            .collect();
        instructions.sort_by_key(|i| i.step_number);
        Ok(Some(RecipeDetails {
            ingredients: inner.lines_of(id),
            recipe,
            instructions,
        }))
    }

    async fn update(&self, id: Uuid, draft: &RecipeDraft) -> anyhow::Result<()> {
        let mut inner = self.lock();
        let Some(recipe) = inner.recipes.iter_mut().find(|r| r.id == id) else {
            bail!("recipe {id} vanished");
        };
        recipe.name = draft.name.clone();
        recipe.description = draft.description.clone();
        recipe.category = draft.category.clone();
        recipe.servings = draft.servings;
        recipe.prep_time = draft.prep_time;
        recipe.cook_time = draft.cook_time;
        recipe.updated_at = OffsetDateTime::now_utc();
        inner.replace_children(id, draft);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        let mut inner = self.lock();
        inner.recipes.retain(|r| r.id != id);
        inner.lines.retain(|(r, _)| *r != id);
        inner.instructions.retain(|i| i.recipe_id != id);
        inner.meal_plans.retain(|p| p.recipe_id != id);
        Ok(())
    }

    async fn find_ingredient_lines(&self, recipe_id: Uuid) -> anyhow::Result<Vec<IngredientLine>> {
        Ok(self.lock().lines_of(recipe_id))
    }
}

#[async_trait]
impl IngredientStore for InMemoryStore {
    async fn create(&self, name: &str) -> anyhow::Result<Option<Ingredient>> {
        let mut inner = self.lock();
        if inner.ingredient_names.values().any(|n| n == name) {
            return Ok(None);
        }
        let id = Uuid::new_v4();
        inner.ingredient_names.insert(id, name.to_string());
        Ok(Some(Ingredient {
            id,
            name: name.to_string(),
            created_at: OffsetDateTime::now_utc(),
        }))
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Ingredient>> {
        let now = OffsetDateTime::now_utc();
        let mut all: Vec<Ingredient> = self
            .lock()
            .ingredient_names
            .iter()
            .map(|(id, name)| Ingredient {
                id: *id,
                name: name.clone(),
                created_at: now,
            })
            .collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Ingredient>> {
        Ok(self.lock().ingredient_names.get(&id).map(|name| Ingredient {
            id,
            name: name.clone(),
            created_at: OffsetDateTime::now_utc(),
        }))
    }

    async fn insert_line(
        &self,
        recipe_id: Uuid,
        ingredient_id: Uuid,
        quantity: f64,
        unit: &str,
    ) -> anyhow::Result<RecipeIngredientRow> {
        let mut inner = self.lock();
        let Some(name) = inner.ingredient_names.get(&ingredient_id).cloned() else {
            bail!("ingredient {ingredient_id} vanished");
        };
        let line = IngredientLine {
            id: Uuid::new_v4(),
            ingredient_id,
            name,
            quantity,
            unit: unit.to_string(),
        };
        let row = RecipeIngredientRow {
            id: line.id,
            recipe_id,
            ingredient_id,
            quantity,
            unit: line.unit.clone(),
        };
        inner.lines.push((recipe_id, line));
        Ok(row)
    }

    async fn find_line_by_id(&self, id: Uuid) -> anyhow::Result<Option<RecipeIngredientRow>> {
        Ok(self
            .lock()
            .lines
            .iter()
            .find(|(_, l)| l.id == id)
            .map(|(recipe_id, l)| RecipeIngredientRow {
                id: l.id,
                recipe_id: *recipe_id,
                ingredient_id: l.ingredient_id,
                quantity: l.quantity,
                unit: l.unit.clone(),
            }))
    }

    async fn delete_line(&self, id: Uuid) -> anyhow::Result<()> {
        self.lock().lines.retain(|(_, l)| l.id != id);
        Ok(())
    }
}

#[async_trait]
impl InstructionStore for InMemoryStore {
    async fn list_by_recipe(&self, recipe_id: Uuid) -> anyhow::Result<Vec<Instruction>> {
        let mut steps: Vec<Instruction> = self
            .lock()
            .instructions
            .iter()
            .filter(|i| i.recipe_id == recipe_id)
            .cloned()
            .collect();
        steps.sort_by_key(|i| i.step_number);
        Ok(steps)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Instruction>> {
        Ok(self.lock().instructions.iter().find(|i| i.id == id).cloned())
    }

    async fn create(
        &self,
        recipe_id: Uuid,
        step_number: i32,
        text: &str,
    ) -> anyhow::Result<Instruction> {
        let step = Instruction {
            id: Uuid::new_v4(),
            recipe_id,
            step_number,
            text: text.to_string(),
        };
        self.lock().instructions.push(step.clone());
        Ok(step)
    }

    async fn update(&self, id: Uuid, step_number: i32, text: &str) -> anyhow::Result<()> {
        let mut inner = self.lock();
        if let Some(step) = inner.instructions.iter_mut().find(|i| i.id == id) {
            step.step_number = step_number;
            step.text = text.to_string();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        self.lock().instructions.retain(|i| i.id != id);
        Ok(())
    }
}

#[async_trait]
impl MealPlanStore for InMemoryStore {
    async fn create(&self, new: NewMealPlan) -> anyhow::Result<MealPlan> {
        let now = OffsetDateTime::now_utc();
        let plan = MealPlan {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            recipe_id: new.recipe_id,
            date: new.date,
            meal_type: new.meal_type,
            target_servings: new.target_servings,
            created_at: now,
            updated_at: now,
        };
        self.lock().meal_plans.push(plan.clone());
        Ok(plan)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<MealPlan>> {
        Ok(self.lock().meal_plans.iter().find(|p| p.id == id).cloned())
    }

    async fn find_duplicate(
        &self,
        user_id: Uuid,
        date: Date,
        meal_type: &str,
    ) -> anyhow::Result<Option<MealPlan>> {
        Ok(self
            .lock()
            .meal_plans
            .iter()
            .find(|p| p.user_id == user_id && p.date == date && p.meal_type == meal_type)
            .cloned())
    }

    async fn list_in_range(
        &self,
        user_id: Uuid,
        start: Date,
        end: Date,
    ) -> anyhow::Result<Vec<MealPlanEntry>> {
        let mut inner = self.lock();
        inner.meal_plan_reads += 1;
        if inner.fail_plan_reads {
            bail!("meal plan store unavailable");
        }
        let entries = inner
            .plans_in_range(user_id, start, end)
            .into_iter()
            .filter_map(|p| {
                let recipe = inner.recipe(p.recipe_id)?;
                Some(MealPlanEntry {
                    id: p.id,
                    recipe_id: p.recipe_id,
                    recipe_name: recipe.name.clone(),
                    recipe_servings: recipe.servings,
                    date: p.date,
                    meal_type: p.meal_type,
                    target_servings: p.target_servings,
                })
            })
            .collect();
        Ok(entries)
    }

    async fn list_in_range_with_ingredients(
        &self,
        user_id: Uuid,
        start: Date,
        end: Date,
    ) -> anyhow::Result<Vec<PlannedRecipe>> {
        let mut inner = self.lock();
        inner.meal_plan_reads += 1;
        if inner.fail_plan_reads {
            bail!("meal plan store unavailable");
        }
        let planned = inner
            .plans_in_range(user_id, start, end)
            .into_iter()
            .filter_map(|p| {
                let recipe = inner.recipe(p.recipe_id)?;
                Some(PlannedRecipe {
                    meal_plan_id: p.id,
                    recipe_id: p.recipe_id,
                    base_servings: recipe.servings,
                    target_servings: p.target_servings,
                    lines: inner.lines_of(p.recipe_id),
                })
            })
            .collect();
        Ok(planned)
    }

    async fn update(&self, plan: &MealPlan) -> anyhow::Result<()> {
        let mut inner = self.lock();
        if let Some(stored) = inner.meal_plans.iter_mut().find(|p| p.id == plan.id) {
            *stored = plan.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        self.lock().meal_plans.retain(|p| p.id != id);
        Ok(())
    }
}

#[async_trait]
impl ShoppingListStore for InMemoryStore {
    async fn create_with_items(
        &self,
        user_id: Uuid,
        start: Date,
        end: Date,
        items: &[AggregatedItem],
    ) -> anyhow::Result<(ShoppingList, Vec<ShoppingListItem>)> {
        let mut inner = self.lock();
        if inner.fail_item_writes && !items.is_empty() {
            // nothing was stored, as after a rolled back transaction
            bail!("insert shopping list item: injected failure");
        }
        let list = ShoppingList {
            id: Uuid::new_v4(),
            user_id,
            start_date: start,
            end_date: end,
            created_at: OffsetDateTime::now_utc(),
        };
        let saved: Vec<ShoppingListItem> = (0_i32..)
            .zip(items)
            .map(|(position, item)| ShoppingListItem {
                id: Uuid::new_v4(),
                shopping_list_id: list.id,
                ingredient_id: item.ingredient_id,
                position,
                quantity: item.quantity,
                unit: item.unit.clone(),
                checked: false,
            })
            .collect();
        inner.lists.push(list.clone());
        inner.items.extend(saved.iter().cloned());
        Ok((list, saved))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<ShoppingList>> {
        Ok(self.lock().lists.iter().find(|l| l.id == id).cloned())
    }

    async fn find_items_by_list_id(
        &self,
        list_id: Uuid,
    ) -> anyhow::Result<Vec<ShoppingListItemView>> {
        let inner = self.lock();
        let mut items: Vec<&ShoppingListItem> = inner
            .items
            .iter()
            .filter(|i| i.shopping_list_id == list_id)
            .collect();
        items.sort_by_key(|i| i.position);
        Ok(items
            .into_iter()
            .map(|i| ShoppingListItemView {
                id: i.id,
                ingredient_id: i.ingredient_id,
                name: inner.ingredient_names.get(&i.ingredient_id).cloned(),
                quantity: i.quantity,
                unit: i.unit.clone(),
                checked: i.checked,
            })
            .collect())
    }

    async fn find_item_by_id(&self, item_id: Uuid) -> anyhow::Result<Option<ShoppingListItem>> {
        Ok(self.lock().items.iter().find(|i| i.id == item_id).cloned())
    }

    async fn update_item(&self, item: &ShoppingListItem) -> anyhow::Result<()> {
        let mut inner = self.lock();
        if let Some(stored) = inner.items.iter_mut().find(|i| i.id == item.id) {
            stored.checked = item.checked;
        }
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<ShoppingListSummary>> {
        let inner = self.lock();
        Ok(inner
            .lists
            .iter()
            .rev()
            .filter(|l| l.user_id == user_id)
            .map(|l| ShoppingListSummary {
                id: l.id,
                start_date: l.start_date,
                end_date: l.end_date,
                item_count: inner
                    .items
                    .iter()
                    .filter(|i| i.shopping_list_id == l.id)
                    .count() as i64,
                created_at: l.created_at,
            })
            .collect())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        let mut inner = self.lock();
        inner.lists.retain(|l| l.id != id);
        inner.items.retain(|i| i.shopping_list_id != id);
        Ok(())
    }
}
